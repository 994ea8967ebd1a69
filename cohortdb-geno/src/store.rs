//! Store serialization.
//!
//! A store bundles the genotype matrix for one assembly with its gene
//! panels, cohorts and risk scores. Format: bincode payload carrying
//! magic bytes (CDBS) + version, plus an optional JSON summary sidecar
//! for human inspection.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cohort::CohortRegistry;
use crate::matrix::GenotypeMatrix;
use crate::panel::PanelRegistry;
use crate::prs::PrsRegistry;
use crate::variant::Assembly;

/// Everything a query engine needs for one assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub magic: [u8; 4],
    pub version: u32,
    pub matrix: GenotypeMatrix,
    pub panels: PanelRegistry,
    pub cohorts: CohortRegistry,
    pub prs: PrsRegistry,
}

impl Store {
    pub const MAGIC: [u8; 4] = *b"CDBS";
    pub const VERSION: u32 = 1;

    pub fn new(
        matrix: GenotypeMatrix,
        panels: PanelRegistry,
        cohorts: CohortRegistry,
        prs: PrsRegistry,
    ) -> Store {
        Store {
            magic: Self::MAGIC,
            version: Self::VERSION,
            matrix,
            panels,
            cohorts,
            prs,
        }
    }

    pub fn assembly(&self) -> Assembly {
        self.matrix.assembly()
    }

    /// Save the store to a binary file (.cdb).
    pub fn save(&self, path: &Path) -> Result<()> {
        let encoded = bincode::serialize(self)?;
        std::fs::write(path, &encoded)
            .with_context(|| format!("failed to write store: {}", path.display()))?;
        info!(path = %path.display(), bytes = encoded.len(), "saved store");
        Ok(())
    }

    /// Load a store from a binary file (.cdb).
    pub fn load(path: &Path) -> Result<Store> {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read store: {}", path.display()))?;
        let mut store: Store = bincode::deserialize(&data)
            .with_context(|| format!("failed to decode store: {}", path.display()))?;
        if store.magic != Self::MAGIC {
            bail!(
                "invalid store file: expected magic bytes {:?}, got {:?}",
                Self::MAGIC,
                store.magic
            );
        }
        if store.version != Self::VERSION {
            bail!(
                "unsupported store version {} (expected {})",
                store.version,
                Self::VERSION
            );
        }
        store.matrix.reindex();
        info!(
            path = %path.display(),
            assembly = %store.assembly(),
            n_samples = store.matrix.n_samples(),
            n_variants = store.matrix.n_variants(),
            "loaded store"
        );
        Ok(store)
    }

    /// Save a JSON summary sidecar (.cdb.json).
    pub fn save_summary_json(&self, path: &Path) -> Result<()> {
        let summary = serde_json::json!({
            "version": self.version,
            "assembly": self.assembly().to_string(),
            "n_samples": self.matrix.n_samples(),
            "n_variants": self.matrix.n_variants(),
            "n_panels": self.panels.len(),
            "n_cohorts": self.cohorts.len(),
            "n_prs": self.prs.len(),
        });
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("failed to write summary: {}", path.display()))?;
        Ok(())
    }
}
