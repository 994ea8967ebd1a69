//! Build a store from a VCF plus sample manifest and annotation files.
//!
//! cohortdb ingest --vcf trio.vcf.gz --manifest samples.tsv \
//!     --assembly GRCh37 --output trio.cdb

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use cohortdb_geno::cohort::SampleInfo;
use cohortdb_geno::manifest::Manifest;
use cohortdb_geno::matrix::GenotypeMatrix;
use cohortdb_geno::panel::PanelRegistry;
use cohortdb_geno::prs::PrsRegistry;
use cohortdb_geno::store::Store;
use cohortdb_geno::vcf;

use std::path::Path;

#[derive(Args)]
pub struct IngestArgs {
    /// Input VCF (.vcf or .vcf.gz)
    #[arg(long)]
    vcf: String,

    /// Sample manifest (sample, sex, cohorts)
    #[arg(long)]
    manifest: String,

    /// Gene panel definitions
    #[arg(long)]
    panels: Option<String>,

    /// Polygenic risk score definitions
    #[arg(long)]
    prs: Option<String>,

    /// Reference assembly the VCF coordinates use
    #[arg(long)]
    assembly: String,

    /// Output store path (.cdb)
    #[arg(long)]
    output: String,

    /// Also write a JSON summary sidecar
    #[arg(long)]
    summary: bool,
}

pub fn run(args: IngestArgs) -> Result<()> {
    info!("=== Ingest ===");
    let assembly = super::parse_assembly(&args.assembly)?;
    if assembly == cohortdb_geno::variant::Assembly::Unspecified {
        bail!("ingest requires a concrete assembly");
    }

    let contents = vcf::read_vcf(Path::new(&args.vcf))?;
    let manifest = Manifest::from_path(Path::new(&args.manifest))?;

    let samples: Vec<SampleInfo> = contents
        .sample_names
        .iter()
        .map(|name| SampleInfo::new(name, manifest.sex(name)))
        .collect();
    let matrix = GenotypeMatrix::load(assembly, samples, contents.records)?;

    let panels = match &args.panels {
        Some(path) => PanelRegistry::from_path(Path::new(path))?,
        None => PanelRegistry::new(),
    };
    let prs = match &args.prs {
        Some(path) => PrsRegistry::from_path(Path::new(path))?,
        None => PrsRegistry::new(),
    };

    let store = Store::new(matrix, panels, manifest.into_cohorts(), prs);
    let out = Path::new(&args.output);
    store.save(out)?;
    if args.summary {
        let sidecar = out.with_extension("cdb.json");
        store.save_summary_json(&sidecar)?;
        info!("Summary written to {}", sidecar.display());
    }

    info!(
        "Store written: {} samples x {} variants",
        store.matrix.n_samples(),
        store.matrix.n_variants()
    );
    Ok(())
}
