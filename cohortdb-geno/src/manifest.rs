//! Sample manifest: declared sex and cohort membership per sample.
//!
//! Tab-separated, one sample per line:
//!
//! ```text
//! sample_name<TAB>sex<TAB>cohort1,cohort2,...
//! ```
//!
//! Sex is one of `male`, `female`, `unknown` (also `M`/`F`/`1`/`2` as
//! in PLINK fam files). The cohort column is optional; an absent or
//! empty column means the sample belongs to no named cohort.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cohort::{CohortRegistry, Sex};

/// Parsed manifest: per-sample sex, plus the cohorts it induces.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    sexes: HashMap<String, Sex>,
    cohorts: CohortRegistry,
}

fn parse_sex(s: &str) -> Result<Sex> {
    match s.to_ascii_lowercase().as_str() {
        "male" | "m" | "1" => Ok(Sex::Male),
        "female" | "f" | "2" => Ok(Sex::Female),
        "unknown" | "u" | "0" | "" => Ok(Sex::Unknown),
        other => anyhow::bail!("unknown sex code: {}", other),
    }
}

impl Manifest {
    pub fn from_path(path: &Path) -> Result<Manifest> {
        let file = File::open(path)
            .with_context(|| format!("failed to open manifest: {}", path.display()))?;
        let manifest = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            n_samples = manifest.sexes.len(),
            n_cohorts = manifest.cohorts.len(),
            "loaded sample manifest"
        );
        Ok(manifest)
    }

    pub fn from_reader<R: Read>(reader: BufReader<R>) -> Result<Manifest> {
        let mut sexes = HashMap::new();
        let mut members: HashMap<String, Vec<String>> = HashMap::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.context("failed to read manifest line")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 || fields.len() > 3 {
                anyhow::bail!(
                    "manifest line {}: expected 2 or 3 fields, got {}",
                    lineno + 1,
                    fields.len()
                );
            }
            let name = fields[0].to_string();
            let sex =
                parse_sex(fields[1]).with_context(|| format!("manifest line {}", lineno + 1))?;
            if sexes.insert(name.clone(), sex).is_some() {
                anyhow::bail!("manifest line {}: duplicate sample {}", lineno + 1, name);
            }
            if let Some(cohort_field) = fields.get(2) {
                for cohort in cohort_field.split(',') {
                    let cohort = cohort.trim();
                    if !cohort.is_empty() {
                        members.entry(cohort.to_string()).or_default().push(name.clone());
                    }
                }
            }
        }
        let mut cohorts = CohortRegistry::new();
        for (name, samples) in members {
            cohorts.insert(&name, samples);
        }
        Ok(Manifest { sexes, cohorts })
    }

    /// Declared sex for a sample, `Unknown` if not listed.
    pub fn sex(&self, sample: &str) -> Sex {
        self.sexes.get(sample).copied().unwrap_or(Sex::Unknown)
    }

    pub fn cohorts(&self) -> &CohortRegistry {
        &self.cohorts
    }

    pub fn into_cohorts(self) -> CohortRegistry {
        self.cohorts
    }
}
