//! Query variants across a named gene panel.
//!
//! cohortdb panel --store trio.cdb --assembly GRCh37 --name cancer104 --hom --het

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::RegionQuery;
use cohortdb_core::request::GenotypeClasses;

#[derive(Args)]
pub struct PanelArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Panel name
    #[arg(long)]
    name: String,

    /// Include homozygous-alt carriers
    #[arg(long)]
    hom: bool,

    /// Include heterozygous carriers
    #[arg(long)]
    het: bool,

    /// Restrict carriers to a named cohort
    #[arg(long)]
    cohort: Option<String>,

    /// Restrict carriers to explicit samples; repeatable
    #[arg(long)]
    sample: Vec<String>,

    /// Also report statistics scoped to the virtual cohort
    #[arg(long)]
    vc_stats: bool,
}

pub fn run(args: PanelArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let mut req = RegionQuery::new(
        super::parse_assembly(&args.assembly)?,
        Vec::new(),
        GenotypeClasses::from_flags(args.hom, args.het),
    );
    req.cohort = args.cohort;
    req.samples = args.sample;
    req.with_vc_stats = args.vc_stats;

    let hits = engine.panel_query(&args.name, req)?;
    super::region::print_hits(&hits);
    Ok(())
}
