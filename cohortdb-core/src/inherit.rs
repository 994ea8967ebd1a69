//! Inheritance-model trio filters.
//!
//! Three-sample genotype-pattern predicates evaluated per variant. All
//! predicates require the relevant calls to be present; any missing
//! call fails the pattern.

use cohortdb_geno::genotype::Genotype;

/// Which parent carries the condition in the dominant pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectedParent {
    Mother,
    Father,
}

/// Inheritance pattern selected by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceModel {
    /// Variant in the proband, absent from both parents.
    DeNovo,
    /// Heterozygous in the affected parent and the affected child,
    /// ref/ref in the unaffected parent.
    HetDominant(AffectedParent),
    /// Both unaffected parents heterozygous carriers, child homozygous.
    HomRecessive,
}

impl InheritanceModel {
    /// Evaluate the pattern on one variant's trio calls.
    pub fn matches(&self, mother: Genotype, father: Genotype, proband: Genotype) -> bool {
        match self {
            InheritanceModel::DeNovo => {
                proband.carries_alt()
                    && mother == Genotype::RefRef
                    && father == Genotype::RefRef
            }
            InheritanceModel::HetDominant(affected) => {
                let (affected_gt, unaffected_gt) = match affected {
                    AffectedParent::Mother => (mother, father),
                    AffectedParent::Father => (father, mother),
                };
                proband == Genotype::RefAlt
                    && affected_gt == Genotype::RefAlt
                    && unaffected_gt == Genotype::RefRef
            }
            InheritanceModel::HomRecessive => {
                mother == Genotype::RefAlt
                    && father == Genotype::RefAlt
                    && proband == Genotype::AltAlt
            }
        }
    }
}
