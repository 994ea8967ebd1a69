//! Chromosome-X F-statistic sex check.
//!
//! cohortdb sex-check --store trio.cdb --assembly GRCh37 \
//!     --male-threshold 0.92 --female-threshold 0.5

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::SexCheckQuery;
use cohortdb_core::exec::CancelToken;
use cohortdb_core::request::ExecMode;

#[derive(Args)]
pub struct SexCheckArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Declared males below this F are mismatched
    #[arg(long, default_value = "0.8")]
    male_threshold: f64,

    /// Declared females above this F are mismatched
    #[arg(long, default_value = "0.5")]
    female_threshold: f64,

    /// Exclude sites with cohort AF at or below this cutoff
    #[arg(long, default_value = "0.0")]
    aaf_threshold: f64,

    /// Report mismatched samples only
    #[arg(long)]
    mismatches_only: bool,

    /// Force single-threaded sequential execution
    #[arg(long)]
    seq: bool,
}

pub fn run(args: SexCheckArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let req = SexCheckQuery {
        assembly: super::parse_assembly(&args.assembly)?,
        male_threshold: args.male_threshold,
        female_threshold: args.female_threshold,
        aaf_threshold: args.aaf_threshold,
        mismatches_only: args.mismatches_only,
        mode: ExecMode::from_seq_flag(args.seq),
    };
    let records = engine.sex_check(&req, &CancelToken::new())?;
    for r in &records {
        println!(
            "{}\t{:?}\tF={:.4}\tsites={}\t{}",
            r.sample,
            r.declared_sex,
            r.f_stat,
            r.n_sites,
            if r.mismatch { "MISMATCH" } else { "ok" }
        );
    }
    Ok(())
}
