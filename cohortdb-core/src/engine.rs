//! The query engine: read-only analytical operations over loaded
//! dataset snapshots.
//!
//! Each assembly maps to an immutable [`Store`] snapshot; replacing a
//! dataset swaps the handle, so in-flight queries keep the view they
//! started with. Absence of data (unknown assembly, cohort, sample or
//! panel names, empty regions, no genotype class selected) resolves to
//! an empty response, never an error.

use std::collections::HashMap;
use std::sync::Arc;

use cohortdb_geno::region::{self, Region};
use cohortdb_geno::store::Store;
use cohortdb_geno::variant::{Assembly, VariantSite};
use serde::Serialize;
use tracing::debug;

use crate::error::QueryResult;
use crate::exec::{merge_top_n, run_shards, CancelToken};
use crate::inherit::InheritanceModel;
use crate::request::{ExecMode, GenotypeClasses, PrsModel, Trio};
use crate::stats::allele::{self, AlleleStats};
use crate::stats::chi2::{chi2_genotype_test, GenotypeCounts};
use crate::stats::fstat;
use crate::stats::hwe::hwe_exact_p;
use crate::stats::kinship::{self, KinshipDegree, PairTally};
use crate::stats::prs::{self, SampleScore};

/// Immutable dataset snapshots keyed by assembly.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    stores: HashMap<Assembly, Arc<Store>>,
}

impl DatasetRegistry {
    pub fn new() -> DatasetRegistry {
        DatasetRegistry::default()
    }

    /// Install or replace the snapshot for the store's assembly.
    pub fn insert(&mut self, store: Store) {
        self.stores.insert(store.assembly(), Arc::new(store));
    }

    /// Snapshot for an assembly. `Unspecified` never resolves.
    pub fn get(&self, assembly: Assembly) -> Option<Arc<Store>> {
        if assembly == Assembly::Unspecified {
            return None;
        }
        self.stores.get(&assembly).cloned()
    }

    pub fn assemblies(&self) -> Vec<Assembly> {
        let mut list: Vec<Assembly> = self.stores.keys().copied().collect();
        list.sort_by_key(|a| format!("{}", a));
        list
    }
}

/// Region/panel query parameters.
#[derive(Debug, Clone)]
pub struct RegionQuery {
    pub assembly: Assembly,
    pub regions: Vec<Region>,
    pub classes: GenotypeClasses,
    pub ref_filter: Option<String>,
    pub alt_filter: Option<String>,
    pub cohort: Option<String>,
    pub samples: Vec<String>,
    /// Report virtual-cohort-scoped stats alongside whole-cohort stats.
    pub with_vc_stats: bool,
}

impl RegionQuery {
    pub fn new(assembly: Assembly, regions: Vec<Region>, classes: GenotypeClasses) -> RegionQuery {
        RegionQuery {
            assembly,
            regions,
            classes,
            ref_filter: None,
            alt_filter: None,
            cohort: None,
            samples: Vec::new(),
            with_vc_stats: false,
        }
    }

    fn has_scope(&self) -> bool {
        self.cohort.is_some() || !self.samples.is_empty()
    }
}

/// One variant returned by a region, panel or inheritance query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantHit {
    pub site: VariantSite,
    /// Whole-cohort statistics; the virtual cohort never changes these.
    pub stats: AlleleStats,
    /// Samples in scope whose genotype matched the requested classes.
    pub samples: Vec<String>,
    /// Statistics restricted to the virtual cohort, when requested.
    pub vc_stats: Option<AlleleStats>,
}

/// One variant of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredVariant {
    #[serde(skip)]
    pub row: usize,
    pub site: VariantSite,
    pub stats: AlleleStats,
    pub stat: f64,
    pub p_value: f64,
}

/// One sample pair of a kinship report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relatedness {
    pub sample_i: String,
    pub sample_j: String,
    pub phi: f64,
    pub degree: KinshipDegree,
}

/// Kinship query parameters.
#[derive(Debug, Clone)]
pub struct KinshipQuery {
    pub assembly: Assembly,
    pub cohort: Option<String>,
    pub samples: Vec<String>,
    /// Keep pairs with phi at or above this cutoff.
    pub threshold: Option<f64>,
    /// Keep pairs classified at or above this degree.
    pub degree: Option<KinshipDegree>,
    pub mode: ExecMode,
}

/// Sex-check query parameters.
#[derive(Debug, Clone)]
pub struct SexCheckQuery {
    pub assembly: Assembly,
    /// Declared males with F below this are mismatched.
    pub male_threshold: f64,
    /// Declared females with F above this are mismatched.
    pub female_threshold: f64,
    /// Sites with cohort AF at or below this (or its complement) are
    /// excluded.
    pub aaf_threshold: f64,
    /// Report only mismatched samples.
    pub mismatches_only: bool,
    pub mode: ExecMode,
}

impl SexCheckQuery {
    pub fn with_defaults(assembly: Assembly) -> SexCheckQuery {
        SexCheckQuery {
            assembly,
            male_threshold: 0.8,
            female_threshold: 0.5,
            aaf_threshold: 0.0,
            mismatches_only: false,
            mode: ExecMode::Parallel,
        }
    }
}

/// One sample of a sex-check report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SexCheckRecord {
    pub sample: String,
    pub declared_sex: cohortdb_geno::cohort::Sex,
    pub f_stat: f64,
    pub n_sites: u64,
    pub mismatch: bool,
}

/// PRS query parameters.
#[derive(Debug, Clone)]
pub struct PrsQuery {
    pub assembly: Assembly,
    pub name: String,
    pub cohort: Option<String>,
    pub samples: Vec<String>,
    pub model: PrsModel,
}

/// PRS response: score cardinality plus per-sample scores. Cardinality
/// is -1 when the score name is unknown, otherwise the number of score
/// sites present in the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrsReport {
    pub cardinality: i64,
    pub scores: Vec<SampleScore>,
}

/// Inheritance query parameters.
#[derive(Debug, Clone)]
pub struct InheritanceQuery {
    pub assembly: Assembly,
    pub trio: Trio,
    pub model: InheritanceModel,
    pub mode: ExecMode,
}

/// The query engine. Cheap to clone; snapshots are shared.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    registry: DatasetRegistry,
}

impl QueryEngine {
    pub fn new(registry: DatasetRegistry) -> QueryEngine {
        QueryEngine { registry }
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DatasetRegistry {
        &mut self.registry
    }

    /// Sample columns a request's cohort/sample scope resolves to, or
    /// `None` when no scope was given (whole cohort). `Some(vec![])`
    /// means a scope was given but resolved to nothing.
    fn scope_columns(
        store: &Store,
        cohort: Option<&str>,
        samples: &[String],
    ) -> Option<Vec<usize>> {
        if cohort.is_none() && samples.is_empty() {
            return None;
        }
        let names = store.cohorts.resolve_names(cohort, samples);
        Some(store.matrix.columns_for(&names))
    }

    /// Variants overlapping the requested regions, filtered by genotype
    /// class within the cohort scope.
    pub fn region_query(&self, req: &RegionQuery) -> QueryResult<Vec<VariantHit>> {
        let Some(store) = self.registry.get(req.assembly) else {
            return Ok(Vec::new());
        };
        if req.classes.is_none() {
            return Ok(Vec::new());
        }
        let matrix = &store.matrix;
        let scope = Self::scope_columns(&store, req.cohort.as_deref(), &req.samples);
        if matches!(scope, Some(ref cols) if cols.is_empty()) {
            return Ok(Vec::new());
        }
        let all_cols: Vec<usize> = (0..matrix.n_samples()).collect();
        let cols = scope.as_deref().unwrap_or(&all_cols);

        let rows = region::rows_in_regions(matrix, &req.regions);
        let mut hits = Vec::new();
        for row in rows {
            let rec = matrix.record(row);
            if let Some(r) = &req.ref_filter {
                if &rec.site.ref_allele != r {
                    continue;
                }
            }
            if let Some(a) = &req.alt_filter {
                if &rec.site.alt_allele != a {
                    continue;
                }
            }
            let matching: Vec<String> = cols
                .iter()
                .filter(|&&col| req.classes.matches(rec.genotypes.get(col)))
                .map(|&col| matrix.sample(col).name.clone())
                .collect();
            if matching.is_empty() {
                continue;
            }
            let stats = allele::compute(rec.site.chrom, &rec.genotypes, matrix.samples());
            let vc_stats = if req.with_vc_stats && scope.is_some() {
                Some(allele::compute_subset(
                    rec.site.chrom,
                    &rec.genotypes,
                    matrix.samples(),
                    cols,
                ))
            } else {
                None
            };
            hits.push(VariantHit {
                site: rec.site.clone(),
                stats,
                samples: matching,
                vc_stats,
            });
        }
        debug!(n_hits = hits.len(), "region query complete");
        Ok(hits)
    }

    /// Panel query: the union of the panel's gene regions. An unknown
    /// panel name yields an empty result.
    pub fn panel_query(
        &self,
        panel: &str,
        mut req: RegionQuery,
    ) -> QueryResult<Vec<VariantHit>> {
        let Some(store) = self.registry.get(req.assembly) else {
            return Ok(Vec::new());
        };
        req.regions = store.panels.regions(panel);
        if req.regions.is_empty() {
            return Ok(Vec::new());
        }
        self.region_query(&req)
    }

    /// Exact-site lookup: whole-cohort statistics for one variant.
    pub fn variant_lookup(
        &self,
        assembly: Assembly,
        site: &VariantSite,
    ) -> Option<(VariantSite, AlleleStats)> {
        let store = self.registry.get(assembly)?;
        let row = store.matrix.find_site(site)?;
        let rec = store.matrix.record(row);
        let stats = allele::compute(rec.site.chrom, &rec.genotypes, store.matrix.samples());
        Some((rec.site.clone(), stats))
    }

    /// Top-N variants by ascending exact HWE p-value over the whole
    /// cohort, ties broken by row order.
    pub fn top_n_hwe(
        &self,
        assembly: Assembly,
        n: usize,
        mode: ExecMode,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<ScoredVariant>> {
        let Some(store) = self.registry.get(assembly) else {
            return Ok(Vec::new());
        };
        let matrix = &store.matrix;
        let shard_results = run_shards(mode, matrix.shards(), cancel, |(_, rows)| {
            let mut local = Vec::new();
            for row in rows {
                let rec = matrix.record(row);
                let stats = allele::compute(rec.site.chrom, &rec.genotypes, matrix.samples());
                let p = hwe_exact_p(stats.hetc, stats.refc(), stats.hom_total());
                local.push(ScoredVariant {
                    row,
                    site: rec.site.clone(),
                    stats,
                    stat: stats.hetc as f64,
                    p_value: p,
                });
            }
            local.sort_by(|a, b| a.p_value.total_cmp(&b.p_value).then(a.row.cmp(&b.row)));
            local.truncate(n);
            Ok(local)
        })?;
        Ok(merge_top_n(shard_results, n, |v| (v.p_value, v.row)))
    }

    /// Top-N variants by ascending chi-squared p-value of the sample
    /// subset's genotype distribution against the whole-cohort
    /// expectation. Zero resolvable samples yields an empty result.
    pub fn top_n_chi2(
        &self,
        assembly: Assembly,
        cohort: Option<&str>,
        samples: &[String],
        n: usize,
        mode: ExecMode,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<ScoredVariant>> {
        let Some(store) = self.registry.get(assembly) else {
            return Ok(Vec::new());
        };
        let matrix = &store.matrix;
        let Some(cols) = Self::scope_columns(&store, cohort, samples) else {
            return Ok(Vec::new());
        };
        if cols.is_empty() {
            return Ok(Vec::new());
        }
        let cols = &cols;
        let shard_results = run_shards(mode, matrix.shards(), cancel, |(_, rows)| {
            let mut local = Vec::new();
            for row in rows {
                let rec = matrix.record(row);
                let whole = allele::compute(rec.site.chrom, &rec.genotypes, matrix.samples());
                let subset =
                    allele::compute_subset(rec.site.chrom, &rec.genotypes, matrix.samples(), cols);
                let (stat, p) = chi2_genotype_test(
                    GenotypeCounts {
                        refref: subset.refc(),
                        het: subset.hetc,
                        homalt: subset.hom_total(),
                    },
                    whole.af,
                );
                local.push(ScoredVariant {
                    row,
                    site: rec.site.clone(),
                    stats: whole,
                    stat,
                    p_value: p,
                });
            }
            local.sort_by(|a, b| a.p_value.total_cmp(&b.p_value).then(a.row.cmp(&b.row)));
            local.truncate(n);
            Ok(local)
        })?;
        Ok(merge_top_n(shard_results, n, |v| (v.p_value, v.row)))
    }

    /// Pairwise kinship over a cohort, filtered by phi or degree
    /// cutoffs. Pairs are reported in sample column order.
    pub fn kinship(
        &self,
        req: &KinshipQuery,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<Relatedness>> {
        let Some(store) = self.registry.get(req.assembly) else {
            return Ok(Vec::new());
        };
        let matrix = &store.matrix;
        let cols = match Self::scope_columns(&store, req.cohort.as_deref(), &req.samples) {
            Some(cols) => cols,
            None => (0..matrix.n_samples()).collect(),
        };
        if cols.len() < 2 {
            return Ok(Vec::new());
        }
        let pairs: Vec<(usize, usize)> = (0..cols.len())
            .flat_map(|i| ((i + 1)..cols.len()).map(move |j| (i, j)))
            .collect();

        let shard_tallies = run_shards(req.mode, matrix.shards(), cancel, |(_, rows)| {
            let tallies: Vec<PairTally> = pairs
                .iter()
                .map(|&(i, j)| kinship::tally_rows(matrix, rows.clone(), cols[i], cols[j]))
                .collect();
            Ok(tallies)
        })?;

        let mut totals = vec![PairTally::default(); pairs.len()];
        for shard in &shard_tallies {
            for (total, tally) in totals.iter_mut().zip(shard) {
                total.merge(tally);
            }
        }

        let mut records = Vec::new();
        for (&(i, j), tally) in pairs.iter().zip(&totals) {
            let phi = tally.phi();
            let degree = KinshipDegree::from_phi(phi);
            if let Some(threshold) = req.threshold {
                if phi < threshold {
                    continue;
                }
            }
            if let Some(min_degree) = req.degree {
                if degree < min_degree {
                    continue;
                }
            }
            records.push(Relatedness {
                sample_i: matrix.sample(cols[i]).name.clone(),
                sample_j: matrix.sample(cols[j]).name.clone(),
                phi,
                degree,
            });
        }
        Ok(records)
    }

    /// Per-sample chrX F-statistics with declared-sex mismatch flags.
    pub fn sex_check(
        &self,
        req: &SexCheckQuery,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<SexCheckRecord>> {
        use cohortdb_geno::cohort::Sex;

        let Some(store) = self.registry.get(req.assembly) else {
            return Ok(Vec::new());
        };
        let matrix = &store.matrix;

        // fixed-size chrX row chunks are the shards here
        let x_span = matrix.chrom_span(cohortdb_geno::variant::Chromosome::ChrX);
        let chunks: Vec<std::ops::Range<usize>> = x_span
            .clone()
            .step_by(4096)
            .map(|lo| lo..(lo + 4096).min(x_span.end))
            .collect();
        let shard_tallies = run_shards(req.mode, chunks, cancel, |rows| {
            Ok(fstat::tally_x_rows(matrix, rows, req.aaf_threshold))
        })?;
        let mut tallies = vec![fstat::XHetTally::default(); matrix.n_samples()];
        for shard in &shard_tallies {
            for (total, tally) in tallies.iter_mut().zip(shard) {
                total.merge(tally);
            }
        }
        let mut records = Vec::new();
        for (col, tally) in tallies.iter().enumerate() {
            let sample = matrix.sample(col);
            let f = tally.f_stat();
            let mismatch = match sample.sex {
                Sex::Male => f < req.male_threshold,
                Sex::Female => f > req.female_threshold,
                Sex::Unknown => false,
            };
            if req.mismatches_only && !mismatch {
                continue;
            }
            records.push(SexCheckRecord {
                sample: sample.name.clone(),
                declared_sex: sample.sex,
                f_stat: f,
                n_sites: tally.n_sites,
                mismatch,
            });
        }
        Ok(records)
    }

    /// Polygenic risk scores for a cohort. Unknown score names yield
    /// cardinality -1 with no scores; a resolvable score with no
    /// matching samples yields its real cardinality and no scores.
    pub fn prs(&self, req: &PrsQuery) -> QueryResult<PrsReport> {
        let Some(store) = self.registry.get(req.assembly) else {
            return Ok(PrsReport {
                cardinality: 0,
                scores: Vec::new(),
            });
        };
        let Some(sites) = store.prs.sites(&req.name) else {
            return Ok(PrsReport {
                cardinality: -1,
                scores: Vec::new(),
            });
        };
        let matrix = &store.matrix;
        let resolved = prs::resolve_sites(matrix, sites);
        let cardinality = resolved.len() as i64;
        let cols = match Self::scope_columns(&store, req.cohort.as_deref(), &req.samples) {
            Some(cols) => cols,
            None => (0..matrix.n_samples()).collect(),
        };
        let scores = cols
            .iter()
            .map(|&col| prs::score_column(matrix, &resolved, col, req.model))
            .collect();
        Ok(PrsReport { cardinality, scores })
    }

    /// Variants matching an inheritance pattern for a trio, across the
    /// whole dataset. Unknown trio sample names yield an empty result.
    pub fn inheritance(
        &self,
        req: &InheritanceQuery,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<VariantHit>> {
        let Some(store) = self.registry.get(req.assembly) else {
            return Ok(Vec::new());
        };
        let matrix = &store.matrix;
        let (Some(mother), Some(father), Some(proband)) = (
            matrix.column(&req.trio.mother),
            matrix.column(&req.trio.father),
            matrix.column(&req.trio.proband),
        ) else {
            return Ok(Vec::new());
        };

        let shard_hits = run_shards(req.mode, matrix.shards(), cancel, |(_, rows)| {
            let mut local = Vec::new();
            for row in rows {
                let rec = matrix.record(row);
                let (gm, gf, gp) = (
                    rec.genotypes.get(mother),
                    rec.genotypes.get(father),
                    rec.genotypes.get(proband),
                );
                if !req.model.matches(gm, gf, gp) {
                    continue;
                }
                let stats = allele::compute(rec.site.chrom, &rec.genotypes, matrix.samples());
                local.push(VariantHit {
                    site: rec.site.clone(),
                    stats,
                    samples: vec![req.trio.proband.clone()],
                    vc_stats: None,
                });
            }
            Ok(local)
        })?;
        Ok(shard_hits.into_iter().flatten().collect())
    }
}
