//! Pairwise kinship over a cohort.
//!
//! cohortdb kinship --store trio.cdb --assembly GRCh37 --cohort trio \
//!     --degree first-degree

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::KinshipQuery;
use cohortdb_core::exec::CancelToken;
use cohortdb_core::request::ExecMode;
use cohortdb_core::stats::kinship::KinshipDegree;

#[derive(Args)]
pub struct KinshipArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Named cohort to analyse
    #[arg(long)]
    cohort: Option<String>,

    /// Explicit samples to analyse; repeatable
    #[arg(long)]
    sample: Vec<String>,

    /// Keep pairs with phi at or above this value
    #[arg(long)]
    threshold: Option<f64>,

    /// Keep pairs at or above this degree (e.g. first-degree)
    #[arg(long)]
    degree: Option<String>,

    /// Force single-threaded sequential execution
    #[arg(long)]
    seq: bool,
}

pub fn run(args: KinshipArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let degree = args
        .degree
        .as_deref()
        .map(|d| d.parse::<KinshipDegree>())
        .transpose()?;

    let req = KinshipQuery {
        assembly: super::parse_assembly(&args.assembly)?,
        cohort: args.cohort,
        samples: args.sample,
        threshold: args.threshold,
        degree,
        mode: ExecMode::from_seq_flag(args.seq),
    };
    let records = engine.kinship(&req, &CancelToken::new())?;
    for r in &records {
        println!("{}\t{}\tphi={:.4}\t{}", r.sample_i, r.sample_j, r.phi, r.degree);
    }
    println!("{} pairs", records.len());
    Ok(())
}
