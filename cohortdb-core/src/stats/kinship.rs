//! Pairwise kinship estimation.
//!
//! KING-robust between-family estimator (Manichaikul et al. 2010) from
//! genotype concordance at autosomal sites where both samples are
//! called:
//!
//!   phi = 0.5 + (2*n_hethet - 4*n_opp_hom - n_het_i - n_het_j)
//!               / (4 * min(n_het_i, n_het_j))
//!
//! where n_hethet counts sites with both samples heterozygous,
//! n_opp_hom counts opposite homozygotes, and n_het_i/n_het_j are the
//! per-sample heterozygote counts over the shared sites. Degree bands
//! follow the KING inference thresholds (powers of 2^-1.5).

use cohortdb_geno::genotype::Genotype;
use cohortdb_geno::matrix::GenotypeMatrix;
use serde::{Deserialize, Serialize};

/// Discrete relatedness class, ordered by increasing relatedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KinshipDegree {
    Unrelated,
    ThirdDegree,
    SecondDegree,
    FirstDegree,
    Duplicate,
}

impl KinshipDegree {
    /// Classify a kinship coefficient by the KING threshold bands.
    pub fn from_phi(phi: f64) -> KinshipDegree {
        if phi > 0.354 {
            KinshipDegree::Duplicate
        } else if phi > 0.177 {
            KinshipDegree::FirstDegree
        } else if phi > 0.0884 {
            KinshipDegree::SecondDegree
        } else if phi > 0.0442 {
            KinshipDegree::ThirdDegree
        } else {
            KinshipDegree::Unrelated
        }
    }
}

impl std::fmt::Display for KinshipDegree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KinshipDegree::Unrelated => "UNRELATED",
            KinshipDegree::ThirdDegree => "THIRD_DEGREE",
            KinshipDegree::SecondDegree => "SECOND_DEGREE",
            KinshipDegree::FirstDegree => "FIRST_DEGREE",
            KinshipDegree::Duplicate => "DUPLICATE",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for KinshipDegree {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "unrelated" => Ok(KinshipDegree::Unrelated),
            "third_degree" | "third" => Ok(KinshipDegree::ThirdDegree),
            "second_degree" | "second" => Ok(KinshipDegree::SecondDegree),
            "first_degree" | "first" => Ok(KinshipDegree::FirstDegree),
            "duplicate" => Ok(KinshipDegree::Duplicate),
            other => anyhow::bail!("unknown kinship degree: {}", other),
        }
    }
}

/// Concordance tallies for one sample pair, accumulated shard by shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairTally {
    pub n_hethet: u64,
    pub n_opp_hom: u64,
    pub n_het_i: u64,
    pub n_het_j: u64,
}

impl PairTally {
    pub fn add(&mut self, gi: Genotype, gj: Genotype) {
        if gi.is_missing() || gj.is_missing() {
            return;
        }
        if gi == Genotype::RefAlt {
            self.n_het_i += 1;
        }
        if gj == Genotype::RefAlt {
            self.n_het_j += 1;
        }
        match (gi, gj) {
            (Genotype::RefAlt, Genotype::RefAlt) => self.n_hethet += 1,
            (Genotype::RefRef, Genotype::AltAlt) | (Genotype::AltAlt, Genotype::RefRef) => {
                self.n_opp_hom += 1
            }
            _ => {}
        }
    }

    pub fn merge(&mut self, other: &PairTally) {
        self.n_hethet += other.n_hethet;
        self.n_opp_hom += other.n_opp_hom;
        self.n_het_i += other.n_het_i;
        self.n_het_j += other.n_het_j;
    }

    /// Kinship coefficient; 0.0 when either sample has no heterozygous
    /// calls at the shared sites (the estimator is undefined there).
    pub fn phi(&self) -> f64 {
        let min_het = self.n_het_i.min(self.n_het_j);
        if min_het == 0 {
            return 0.0;
        }
        0.5 + (2.0 * self.n_hethet as f64
            - 4.0 * self.n_opp_hom as f64
            - self.n_het_i as f64
            - self.n_het_j as f64)
            / (4.0 * min_het as f64)
    }
}

/// Accumulate pair tallies for two columns over a row range, autosomes
/// only.
pub fn tally_rows(
    matrix: &GenotypeMatrix,
    rows: std::ops::Range<usize>,
    col_i: usize,
    col_j: usize,
) -> PairTally {
    let mut tally = PairTally::default();
    for row in rows {
        let rec = matrix.record(row);
        if !rec.site.chrom.is_autosome() {
            continue;
        }
        tally.add(rec.genotypes.get(col_i), rec.genotypes.get(col_j));
    }
    tally
}
