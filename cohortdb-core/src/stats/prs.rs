//! Polygenic risk scoring.
//!
//! Score sites are resolved against the matrix by exact site identity;
//! absent sites do not contribute and are excluded from the score's
//! cardinality. A missing genotype excludes that site from the sample's
//! score and from both per-sample cardinalities.

use cohortdb_geno::genotype::Genotype;
use cohortdb_geno::matrix::GenotypeMatrix;
use cohortdb_geno::prs::PrsSite;
use serde::Serialize;

use crate::request::PrsModel;

/// One sample's score over the resolved sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleScore {
    pub sample: String,
    pub score: f64,
    /// Resolved sites where the sample carries at least one alt allele.
    pub hethom_cardinality: u32,
    /// Resolved sites where the sample is ref/ref.
    pub ref_cardinality: u32,
}

/// Score site resolved to a matrix row.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSite {
    pub row: usize,
    pub weight: f64,
}

/// Resolve score sites to matrix rows, dropping absent sites.
pub fn resolve_sites(matrix: &GenotypeMatrix, sites: &[PrsSite]) -> Vec<ResolvedSite> {
    sites
        .iter()
        .filter_map(|s| {
            matrix.find_site(&s.site).map(|row| ResolvedSite {
                row,
                weight: s.weight,
            })
        })
        .collect()
}

/// Score one sample column over the resolved sites.
pub fn score_column(
    matrix: &GenotypeMatrix,
    resolved: &[ResolvedSite],
    col: usize,
    model: PrsModel,
) -> SampleScore {
    let mut score = 0.0;
    let mut hethom = 0u32;
    let mut refc = 0u32;
    for site in resolved {
        let gt = matrix.record(site.row).genotypes.get(col);
        let Some(dosage) = model.dosage(gt) else {
            continue;
        };
        score += site.weight * dosage;
        if gt.carries_alt() {
            hethom += 1;
        } else if gt == Genotype::RefRef {
            refc += 1;
        }
    }
    SampleScore {
        sample: matrix.sample(col).name.clone(),
        score,
        hethom_cardinality: hethom,
        ref_cardinality: refc,
    }
}
