//! Chi-squared genotype goodness-of-fit test.
//!
//! Compares the observed genotype distribution of a sample subset
//! against the distribution expected from the whole-cohort allele
//! frequency under random mating: (1-p)^2, 2p(1-p), p^2 for ref/ref,
//! het and hom-alt. The statistic is referred to a chi-squared
//! distribution with one degree of freedom (one free parameter, the
//! allele frequency, is taken from the cohort).

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Observed genotype counts of the tested subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenotypeCounts {
    pub refref: u32,
    pub het: u32,
    pub homalt: u32,
}

impl GenotypeCounts {
    pub fn n(&self) -> u32 {
        self.refref + self.het + self.homalt
    }
}

/// Chi-squared statistic and p-value. Returns (0.0, 1.0) when the
/// subset is empty or the expectation is degenerate (cohort allele
/// frequency of 0 or 1 leaves a single expected class).
pub fn chi2_genotype_test(obs: GenotypeCounts, cohort_af: f64) -> (f64, f64) {
    let n = obs.n() as f64;
    if n == 0.0 {
        return (0.0, 1.0);
    }
    let p = cohort_af;
    let q = 1.0 - p;
    let expected = [n * q * q, 2.0 * n * p * q, n * p * p];
    let observed = [obs.refref as f64, obs.het as f64, obs.homalt as f64];

    let mut stat = 0.0;
    let mut cells = 0;
    for (o, e) in observed.iter().zip(expected.iter()) {
        if *e > 0.0 {
            stat += (o - e) * (o - e) / e;
            cells += 1;
        }
    }
    if cells < 2 {
        return (0.0, 1.0);
    }

    let chi2 = ChiSquared::new(1.0).unwrap();
    let pvalue = 1.0 - chi2.cdf(stat);
    (stat, pvalue.clamp(0.0, 1.0))
}
