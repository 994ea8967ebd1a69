//! Top-N variant rankings by HWE and chi-squared p-values.
//!
//! cohortdb top-hwe --store trio.cdb --assembly GRCh37 -n 10
//! cohortdb top-chi2 --store trio.cdb --assembly GRCh37 -n 10 --sample HG002

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::ScoredVariant;
use cohortdb_core::exec::CancelToken;
use cohortdb_core::request::ExecMode;

#[derive(Args)]
pub struct TopHweArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Number of variants to report
    #[arg(short, default_value = "10")]
    n: usize,

    /// Force single-threaded sequential execution
    #[arg(long)]
    seq: bool,
}

#[derive(Args)]
pub struct TopChi2Args {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Number of variants to report
    #[arg(short, default_value = "10")]
    n: usize,

    /// Cohort whose genotype distribution is tested
    #[arg(long)]
    cohort: Option<String>,

    /// Explicit samples to test; repeatable
    #[arg(long)]
    sample: Vec<String>,

    /// Force single-threaded sequential execution
    #[arg(long)]
    seq: bool,
}

fn print_ranked(ranked: &[ScoredVariant]) {
    for (i, v) in ranked.iter().enumerate() {
        println!(
            "{}\t{}\tp={:.6e}\tstat={:.4}\taf={:.4}",
            i + 1,
            v.site,
            v.p_value,
            v.stat,
            v.stats.af
        );
    }
}

pub fn run_hwe(args: TopHweArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let ranked = engine.top_n_hwe(
        super::parse_assembly(&args.assembly)?,
        args.n,
        ExecMode::from_seq_flag(args.seq),
        &CancelToken::new(),
    )?;
    print_ranked(&ranked);
    Ok(())
}

pub fn run_chi2(args: TopChi2Args) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let ranked = engine.top_n_chi2(
        super::parse_assembly(&args.assembly)?,
        args.cohort.as_deref(),
        &args.sample,
        args.n,
        ExecMode::from_seq_flag(args.seq),
        &CancelToken::new(),
    )?;
    print_ranked(&ranked);
    Ok(())
}
