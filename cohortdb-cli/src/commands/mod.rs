//! CLI subcommands.

pub mod ingest;
pub mod inherit;
pub mod kinship;
pub mod lookup;
pub mod panel;
pub mod prs;
pub mod rank;
pub mod region;
pub mod sex_check;

use anyhow::Result;
use cohortdb_core::engine::{DatasetRegistry, QueryEngine};
use cohortdb_geno::store::Store;
use cohortdb_geno::variant::Assembly;
use std::path::Path;

/// Load one store file into a fresh engine.
pub(crate) fn open_engine(store_path: &str) -> Result<QueryEngine> {
    let store = Store::load(Path::new(store_path))?;
    let mut registry = DatasetRegistry::new();
    registry.insert(store);
    Ok(QueryEngine::new(registry))
}

/// Parse an assembly argument.
pub(crate) fn parse_assembly(s: &str) -> Result<Assembly> {
    s.parse()
}
