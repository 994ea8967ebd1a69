//! Samples, sexes and cohort membership.
//!
//! A cohort is a named set of sample names; a "virtual cohort" is an
//! ad-hoc sample list supplied per request and resolved with identical
//! semantics. Sample names that don't exist in the matrix are ignored
//! rather than rejected: they reduce the effective cohort size.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Declared or inferred sample sex; drives chrX allele accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

/// A sample column of the genotype matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub name: String,
    pub sex: Sex,
}

impl SampleInfo {
    pub fn new(name: &str, sex: Sex) -> SampleInfo {
        SampleInfo {
            name: name.to_string(),
            sex,
        }
    }
}

/// Named cohorts mapped to their member sample names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortRegistry {
    cohorts: HashMap<String, Vec<String>>,
}

impl CohortRegistry {
    pub fn new() -> CohortRegistry {
        CohortRegistry::default()
    }

    /// Register a cohort, replacing any previous definition.
    pub fn insert(&mut self, name: &str, members: Vec<String>) {
        self.cohorts.insert(name.to_string(), members);
    }

    /// Member names for a cohort; `None` for an unknown name.
    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.cohorts.get(name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    /// Resolve a cohort name plus an explicit sample list to the union
    /// of sample names. An unknown cohort contributes nothing; the
    /// explicit list may still select samples on its own.
    pub fn resolve_names(&self, cohort: Option<&str>, samples: &[String]) -> Vec<String> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        if let Some(c) = cohort {
            if let Some(members) = self.members(c) {
                names.extend(members.iter().map(|s| s.as_str()));
            }
        }
        names.extend(samples.iter().map(|s| s.as_str()));
        names.into_iter().map(String::from).collect()
    }
}
