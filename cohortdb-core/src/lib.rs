//! cohortdb-core: query engine and statistics for cohortdb.
//!
//! Region, panel and cohort queries over immutable genotype matrix
//! snapshots; Hardy-Weinberg and chi-squared top-N rankings; kinship,
//! sex-check and polygenic risk scoring; inheritance-pattern filters.
//! Shard-parallel execution with a sequential reference mode that is
//! equivalent by construction.

pub mod engine;
pub mod error;
pub mod exec;
pub mod inherit;
pub mod request;
pub mod stats;
