//! Chromosome-X F-statistic for genetic sex inference.
//!
//! Per sample, over polymorphic chrX sites:
//!
//!   F = 1 - observed_hets / expected_hets
//!
//! where expected_hets sums 2p(1-p) over the sites at which the sample
//! is called, with p the cohort alt allele frequency at that site.
//! Males (hemizygous, stored as homozygous) approach F = 1; diploid
//! females approach F = 0. An AAF cutoff excludes sites with cohort
//! frequency at or below the cutoff (or at or above its complement),
//! where the expectation carries no information.

use cohortdb_geno::genotype::Genotype;
use cohortdb_geno::matrix::GenotypeMatrix;
use cohortdb_geno::variant::Chromosome;

use crate::stats::allele;

/// Per-sample heterozygosity tallies over chrX.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct XHetTally {
    pub n_sites: u64,
    pub obs_hets: u64,
    pub exp_hets: f64,
}

impl XHetTally {
    /// F-statistic; 1.0 when no informative site was observed.
    pub fn f_stat(&self) -> f64 {
        if self.exp_hets == 0.0 {
            return 1.0;
        }
        1.0 - self.obs_hets as f64 / self.exp_hets
    }

    pub fn merge(&mut self, other: &XHetTally) {
        self.n_sites += other.n_sites;
        self.obs_hets += other.obs_hets;
        self.exp_hets += other.exp_hets;
    }
}

/// Accumulate chrX heterozygosity for every matrix column. Sites whose
/// cohort allele frequency lies outside (aaf_threshold, 1 - aaf_threshold)
/// are skipped.
pub fn tally_x_heterozygosity(matrix: &GenotypeMatrix, aaf_threshold: f64) -> Vec<XHetTally> {
    tally_x_rows(matrix, matrix.chrom_span(Chromosome::ChrX), aaf_threshold)
}

/// Per-column tallies over one chrX row range; range results merge
/// columnwise into the whole-chromosome tallies.
pub fn tally_x_rows(
    matrix: &GenotypeMatrix,
    rows: std::ops::Range<usize>,
    aaf_threshold: f64,
) -> Vec<XHetTally> {
    let mut tallies = vec![XHetTally::default(); matrix.n_samples()];
    for row in rows {
        let rec = matrix.record(row);
        let stats = allele::compute(Chromosome::ChrX, &rec.genotypes, matrix.samples());
        let p = stats.af;
        if p <= aaf_threshold || p >= 1.0 - aaf_threshold {
            continue;
        }
        let exp = 2.0 * p * (1.0 - p);
        for (col, gt) in rec.genotypes.iter().enumerate() {
            if gt.is_missing() {
                continue;
            }
            let tally = &mut tallies[col];
            tally.n_sites += 1;
            tally.exp_hets += exp;
            if gt == Genotype::RefAlt {
                tally.obs_hets += 1;
            }
        }
    }
    tallies
}
