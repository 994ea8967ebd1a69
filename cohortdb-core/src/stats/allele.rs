//! Per-variant allele statistics.
//!
//! AN counts two allele slots per non-missing genotype; missing calls
//! contribute nothing to AC or AN, so AF = AC/AN holds exactly over the
//! observed calls. On chrX the homozygote count splits by sex: female
//! hom-alt calls go to HOMFC, everything else (male hemizygous calls
//! are stored as hom-alt) goes to HOMC.

use cohortdb_geno::cohort::{SampleInfo, Sex};
use cohortdb_geno::genotype::{Genotype, GenotypeRow};
use cohortdb_geno::variant::Chromosome;
use serde::{Deserialize, Serialize};

/// Allele statistics for one variant over a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlleleStats {
    pub ac: u32,
    pub an: u32,
    pub af: f64,
    pub homc: u32,
    pub hetc: u32,
    pub misc: u32,
    /// Female homozygote count; populated on chrX only.
    pub homfc: u32,
}

/// Statistics over an explicit column subset.
pub fn compute_subset(
    chrom: Chromosome,
    row: &GenotypeRow,
    samples: &[SampleInfo],
    cols: &[usize],
) -> AlleleStats {
    let mut stats = AlleleStats::default();
    for &col in cols {
        tally(&mut stats, chrom, row.get(col), samples[col].sex);
    }
    finish(stats)
}

/// Statistics over all columns of the row.
pub fn compute(chrom: Chromosome, row: &GenotypeRow, samples: &[SampleInfo]) -> AlleleStats {
    let mut stats = AlleleStats::default();
    for (col, gt) in row.iter().enumerate() {
        tally(&mut stats, chrom, gt, samples[col].sex);
    }
    finish(stats)
}

fn tally(stats: &mut AlleleStats, chrom: Chromosome, gt: Genotype, sex: Sex) {
    match gt {
        Genotype::Missing => {
            stats.misc += 1;
            return;
        }
        Genotype::RefRef => {}
        Genotype::RefAlt => stats.hetc += 1,
        Genotype::AltAlt => {
            if chrom.is_x() && sex == Sex::Female {
                stats.homfc += 1;
            } else {
                stats.homc += 1;
            }
        }
    }
    stats.ac += gt.alt_copies();
    stats.an += 2;
}

fn finish(mut stats: AlleleStats) -> AlleleStats {
    stats.af = if stats.an > 0 {
        stats.ac as f64 / stats.an as f64
    } else {
        0.0
    };
    stats
}

/// Total hom-alt count regardless of sex split.
impl AlleleStats {
    pub fn hom_total(&self) -> u32 {
        self.homc + self.homfc
    }

    /// Non-missing genotype count.
    pub fn n_called(&self) -> u32 {
        self.an / 2
    }

    /// Ref/ref genotype count.
    pub fn refc(&self) -> u32 {
        self.n_called() - self.hetc - self.hom_total()
    }
}
