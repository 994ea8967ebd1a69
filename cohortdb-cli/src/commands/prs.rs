//! Polygenic risk scores for a cohort.
//!
//! cohortdb prs --store trio.cdb --assembly GRCh37 \
//!     --name "Atrial fibrillation" --cohort trio

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::PrsQuery;
use cohortdb_core::request::PrsModel;

#[derive(Args)]
pub struct PrsArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Risk score name
    #[arg(long)]
    name: String,

    /// Named cohort to score
    #[arg(long)]
    cohort: Option<String>,

    /// Explicit samples to score; repeatable
    #[arg(long)]
    sample: Vec<String>,

    /// Dominant model: any alt carrier scores 1
    #[arg(long)]
    dominant: bool,

    /// Recessive model: only hom-alt scores 1
    #[arg(long)]
    recessive: bool,
}

pub fn run(args: PrsArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let model = PrsModel::from_flags(args.dominant, args.recessive)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let req = PrsQuery {
        assembly: super::parse_assembly(&args.assembly)?,
        name: args.name,
        cohort: args.cohort,
        samples: args.sample,
        model,
    };
    let report = engine.prs(&req)?;
    println!("cardinality={}", report.cardinality);
    for s in &report.scores {
        println!(
            "{}\tscore={:.4}\thethom={}\tref={}",
            s.sample, s.score, s.hethom_cardinality, s.ref_cardinality
        );
    }
    Ok(())
}
