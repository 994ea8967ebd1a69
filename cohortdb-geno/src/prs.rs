//! Polygenic risk score definitions.
//!
//! A PRS is a named list of weighted variant sites. The score file is
//! tab-separated, one site per line:
//!
//! ```text
//! prs_name<TAB>chrom<TAB>pos<TAB>ref<TAB>alt<TAB>weight
//! ```
//!
//! Sites are matched against the matrix by exact (chrom, pos, ref, alt)
//! identity at scoring time; sites absent from the matrix simply do not
//! contribute.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::variant::VariantSite;

/// One weighted site of a risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrsSite {
    pub site: VariantSite,
    pub weight: f64,
}

/// Named polygenic risk scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrsRegistry {
    scores: HashMap<String, Vec<PrsSite>>,
}

impl PrsRegistry {
    pub fn new() -> PrsRegistry {
        PrsRegistry::default()
    }

    pub fn from_path(path: &Path) -> Result<PrsRegistry> {
        let file = File::open(path)
            .with_context(|| format!("failed to open PRS file: {}", path.display()))?;
        let reg = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), n_scores = reg.len(), "loaded risk scores");
        Ok(reg)
    }

    pub fn from_reader<R: Read>(reader: BufReader<R>) -> Result<PrsRegistry> {
        let mut scores: HashMap<String, Vec<PrsSite>> = HashMap::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.context("failed to read PRS file line")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 6 {
                anyhow::bail!(
                    "PRS file line {}: expected 6 fields, got {}",
                    lineno + 1,
                    fields.len()
                );
            }
            let chrom = fields[1]
                .parse()
                .with_context(|| format!("PRS file line {}", lineno + 1))?;
            let pos: u32 = fields[2]
                .parse()
                .with_context(|| format!("PRS file line {}", lineno + 1))?;
            let weight: f64 = fields[5]
                .parse()
                .with_context(|| format!("PRS file line {}", lineno + 1))?;
            scores.entry(fields[0].to_string()).or_default().push(PrsSite {
                site: VariantSite::at(chrom, pos, fields[3], fields[4]),
                weight,
            });
        }
        Ok(PrsRegistry { scores })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Weighted sites of a score; `None` for an unknown name.
    pub fn sites(&self, name: &str) -> Option<&[PrsSite]> {
        self.scores.get(name).map(|v| v.as_slice())
    }
}
