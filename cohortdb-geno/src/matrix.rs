//! The in-memory genotype matrix.
//!
//! Rows are variant sites in canonical (chromosome, start, end, ref, alt)
//! order, columns are samples. Rows within a chromosome are additionally
//! indexed by the widest site span seen on that chromosome, which bounds
//! how far left an overlap scan must start.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cohort::SampleInfo;
use crate::genotype::GenotypeRow;
use crate::variant::{Assembly, Chromosome, VariantSite};

/// One variant row: its site identity plus packed genotypes for every
/// sample column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub site: VariantSite,
    pub genotypes: GenotypeRow,
}

/// Immutable genotype matrix for a single reference assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenotypeMatrix {
    assembly: Assembly,
    samples: Vec<SampleInfo>,
    #[serde(skip)]
    name_to_col: HashMap<String, usize>,
    records: Vec<VariantRecord>,
    chrom_spans: HashMap<Chromosome, Range<usize>>,
    /// Widest (end - start) per chromosome, for overlap scan widening.
    max_span: HashMap<Chromosome, u32>,
}

impl GenotypeMatrix {
    /// Build a matrix from sample columns and variant rows. Rows are
    /// sorted into canonical order; duplicate sites and rows whose
    /// genotype count disagrees with the sample count are rejected.
    pub fn load(
        assembly: Assembly,
        samples: Vec<SampleInfo>,
        mut records: Vec<VariantRecord>,
    ) -> Result<GenotypeMatrix> {
        let n = samples.len();
        for rec in &records {
            if rec.genotypes.n_samples() != n {
                bail!(
                    "row {} has {} genotypes, expected {}",
                    rec.site,
                    rec.genotypes.n_samples(),
                    n
                );
            }
        }
        records.sort_by(|a, b| a.site.cmp(&b.site));
        for pair in records.windows(2) {
            if pair[0].site == pair[1].site {
                bail!("duplicate variant site: {}", pair[0].site);
            }
        }

        let mut chrom_spans: HashMap<Chromosome, Range<usize>> = HashMap::new();
        let mut max_span: HashMap<Chromosome, u32> = HashMap::new();
        for (i, rec) in records.iter().enumerate() {
            let chrom = rec.site.chrom;
            chrom_spans
                .entry(chrom)
                .and_modify(|r| r.end = i + 1)
                .or_insert(i..i + 1);
            let span = rec.site.end - rec.site.start;
            let entry = max_span.entry(chrom).or_insert(0);
            *entry = (*entry).max(span);
        }

        let name_to_col = samples
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect::<HashMap<_, _>>();
        if name_to_col.len() != samples.len() {
            bail!("duplicate sample names in matrix");
        }

        info!(
            assembly = %assembly,
            n_samples = samples.len(),
            n_variants = records.len(),
            "loaded genotype matrix"
        );

        Ok(GenotypeMatrix {
            assembly,
            samples,
            name_to_col,
            records,
            chrom_spans,
            max_span,
        })
    }

    /// Rebuild indexes that are not serialized.
    pub(crate) fn reindex(&mut self) {
        self.name_to_col = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
    }

    pub fn assembly(&self) -> Assembly {
        self.assembly
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_variants(&self) -> usize {
        self.records.len()
    }

    pub fn samples(&self) -> &[SampleInfo] {
        &self.samples
    }

    pub fn sample(&self, col: usize) -> &SampleInfo {
        &self.samples[col]
    }

    /// Column index for a sample name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.name_to_col.get(name).copied()
    }

    /// Column indices for a list of sample names, deduplicated and
    /// sorted. Unknown names are ignored.
    pub fn columns_for(&self, names: &[String]) -> Vec<usize> {
        let cols: BTreeSet<usize> = names
            .iter()
            .filter_map(|n| self.column(n))
            .collect();
        cols.into_iter().collect()
    }

    pub fn record(&self, row: usize) -> &VariantRecord {
        &self.records[row]
    }

    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    /// Contiguous row range holding a chromosome's variants.
    pub fn chrom_span(&self, chrom: Chromosome) -> Range<usize> {
        self.chrom_spans.get(&chrom).cloned().unwrap_or(0..0)
    }

    /// Widest site span on a chromosome, 0 if no rows.
    pub fn max_site_span(&self, chrom: Chromosome) -> u32 {
        self.max_span.get(&chrom).copied().unwrap_or(0)
    }

    /// Non-empty per-chromosome row ranges in canonical order. These are
    /// the natural work shards for parallel scans.
    pub fn shards(&self) -> Vec<(Chromosome, Range<usize>)> {
        Chromosome::ALL
            .iter()
            .filter_map(|&c| {
                let span = self.chrom_span(c);
                if span.is_empty() {
                    None
                } else {
                    Some((c, span))
                }
            })
            .collect()
    }

    /// Row index of an exact site, if present.
    pub fn find_site(&self, site: &VariantSite) -> Option<usize> {
        self.records
            .binary_search_by(|rec| rec.site.cmp(site))
            .ok()
    }
}
