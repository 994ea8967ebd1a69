//! Gene panels: named collections of gene regions.
//!
//! Panel file format is tab-separated, one gene region per line:
//!
//! ```text
//! panel_name<TAB>gene_symbol<TAB>chrom<TAB>start<TAB>end
//! ```
//!
//! Lines starting with `#` are ignored. A panel query resolves to the
//! union of its gene regions, so genes with overlapping coordinates do
//! not double-count variants.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::region::Region;

/// One gene entry inside a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelGene {
    pub symbol: String,
    pub region: Region,
}

/// Named gene panels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelRegistry {
    panels: HashMap<String, Vec<PanelGene>>,
}

impl PanelRegistry {
    pub fn new() -> PanelRegistry {
        PanelRegistry::default()
    }

    /// Read panel definitions from a file.
    pub fn from_path(path: &Path) -> Result<PanelRegistry> {
        let file = File::open(path)
            .with_context(|| format!("failed to open panel file: {}", path.display()))?;
        let reg = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), n_panels = reg.len(), "loaded gene panels");
        Ok(reg)
    }

    /// Parse panel definitions from any reader.
    pub fn from_reader<R: Read>(reader: BufReader<R>) -> Result<PanelRegistry> {
        let mut panels: HashMap<String, Vec<PanelGene>> = HashMap::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.context("failed to read panel file line")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 5 {
                anyhow::bail!(
                    "panel file line {}: expected 5 fields, got {}",
                    lineno + 1,
                    fields.len()
                );
            }
            let region = Region {
                chrom: fields[2]
                    .parse()
                    .with_context(|| format!("panel file line {}", lineno + 1))?,
                start: fields[3]
                    .parse()
                    .with_context(|| format!("panel file line {}", lineno + 1))?,
                end: fields[4]
                    .parse()
                    .with_context(|| format!("panel file line {}", lineno + 1))?,
            };
            panels.entry(fields[0].to_string()).or_default().push(PanelGene {
                symbol: fields[1].to_string(),
                region,
            });
        }
        Ok(PanelRegistry { panels })
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn genes(&self, panel: &str) -> Option<&[PanelGene]> {
        self.panels.get(panel).map(|v| v.as_slice())
    }

    /// Regions of a panel's genes; empty for an unknown panel name.
    pub fn regions(&self, panel: &str) -> Vec<Region> {
        self.genes(panel)
            .map(|genes| genes.iter().map(|g| g.region).collect())
            .unwrap_or_default()
    }
}
