//! Request-side types shared across operations.
//!
//! Boolean flag pairs from the wire are turned into tagged enums at the
//! boundary; illegal combinations are rejected before any computation.

use cohortdb_geno::genotype::Genotype;

use crate::error::{QueryError, QueryResult};

/// Which genotype classes a region query includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeClasses {
    /// Neither class selected: every row yields zero entries.
    None,
    HomAlt,
    Het,
    HomAltOrHet,
}

impl GenotypeClasses {
    /// Build from the wire-level (hom, het) flag pair.
    pub fn from_flags(hom: bool, het: bool) -> GenotypeClasses {
        match (hom, het) {
            (false, false) => GenotypeClasses::None,
            (true, false) => GenotypeClasses::HomAlt,
            (false, true) => GenotypeClasses::Het,
            (true, true) => GenotypeClasses::HomAltOrHet,
        }
    }

    /// Whether a genotype call falls in the selected classes.
    pub fn matches(&self, gt: Genotype) -> bool {
        match self {
            GenotypeClasses::None => false,
            GenotypeClasses::HomAlt => gt == Genotype::AltAlt,
            GenotypeClasses::Het => gt == Genotype::RefAlt,
            GenotypeClasses::HomAltOrHet => gt.carries_alt(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, GenotypeClasses::None)
    }
}

/// Genetic model for risk scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrsModel {
    /// Dosage counts alt allele copies (0, 1 or 2).
    #[default]
    Additive,
    /// Dosage is 1 for any alt carrier.
    Dominant,
    /// Dosage is 1 for homozygous alt only.
    Recessive,
}

impl PrsModel {
    /// Build from the wire-level (dominant, recessive) flag pair.
    /// Setting both is an invalid argument.
    pub fn from_flags(dominant: bool, recessive: bool) -> QueryResult<PrsModel> {
        match (dominant, recessive) {
            (true, true) => Err(QueryError::InvalidArgument(
                "dominant and recessive models are mutually exclusive".to_string(),
            )),
            (true, false) => Ok(PrsModel::Dominant),
            (false, true) => Ok(PrsModel::Recessive),
            (false, false) => Ok(PrsModel::Additive),
        }
    }

    /// Model dosage for one genotype call; `None` for a missing call,
    /// which excludes the site from the score entirely.
    pub fn dosage(&self, gt: Genotype) -> Option<f64> {
        if gt.is_missing() {
            return None;
        }
        let d = match self {
            PrsModel::Additive => gt.alt_copies() as f64,
            PrsModel::Dominant => {
                if gt.carries_alt() {
                    1.0
                } else {
                    0.0
                }
            }
            PrsModel::Recessive => {
                if gt == Genotype::AltAlt {
                    1.0
                } else {
                    0.0
                }
            }
        };
        Some(d)
    }
}

/// Execution mode for shard-parallel computations. Both modes run the
/// identical shard algorithm; sequential just drives the shards one at
/// a time on the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    #[default]
    Parallel,
    Sequential,
}

impl ExecMode {
    /// Build from the wire-level `seq` flag.
    pub fn from_seq_flag(seq: bool) -> ExecMode {
        if seq {
            ExecMode::Sequential
        } else {
            ExecMode::Parallel
        }
    }
}

/// A trio annotation supplied per request for inheritance filters.
#[derive(Debug, Clone)]
pub struct Trio {
    pub mother: String,
    pub father: String,
    pub proband: String,
}
