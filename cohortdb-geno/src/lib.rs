//! cohortdb-geno: data layer for cohortdb.
//!
//! Genotype encoding, the per-assembly genotype matrix store, region
//! index, gene panels, cohorts and samples, VCF ingestion and store
//! serialization.

pub mod cohort;
pub mod genotype;
pub mod manifest;
pub mod matrix;
pub mod panel;
pub mod prs;
pub mod region;
pub mod store;
pub mod variant;
pub mod vcf;
