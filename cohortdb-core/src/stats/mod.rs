//! Population-genetics statistics over genotype slices.

pub mod allele;
pub mod chi2;
pub mod fstat;
pub mod hwe;
pub mod kinship;
pub mod prs;
