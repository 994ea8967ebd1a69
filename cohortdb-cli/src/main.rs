//! cohortdb: population-scale variant store and query engine.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cohortdb",
    version,
    about = "Population-scale genomic variant database",
    long_about = "Stores per-assembly cohort genotype matrices and answers region,\n\
                   panel and cohort queries plus population-genetics statistics:\n\
                   HWE and chi-squared rankings, kinship, sex checks, risk scores\n\
                   and inheritance-pattern filters."
)]
struct Cli {
    /// Number of threads to use (0 = all cores)
    #[arg(long, default_value = "0", global = true)]
    threads: usize,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a store from a VCF, sample manifest and annotation files
    Ingest(commands::ingest::IngestArgs),

    /// Query variants in one or more genomic regions
    Region(commands::region::RegionArgs),

    /// Query variants across a named gene panel
    Panel(commands::panel::PanelArgs),

    /// Look up a single variant's allele statistics
    Lookup(commands::lookup::LookupArgs),

    /// Rank variants by Hardy-Weinberg p-value
    TopHwe(commands::rank::TopHweArgs),

    /// Rank variants by chi-squared genotype test p-value
    TopChi2(commands::rank::TopChi2Args),

    /// Pairwise kinship over a cohort
    Kinship(commands::kinship::KinshipArgs),

    /// Chromosome-X F-statistic sex check
    SexCheck(commands::sex_check::SexCheckArgs),

    /// Polygenic risk scores for a cohort
    Prs(commands::prs::PrsArgs),

    /// Inheritance-pattern trio filters
    Inherit(commands::inherit::InheritArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Set up thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    tracing::info!("cohortdb v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Ingest(args) => commands::ingest::run(args),
        Commands::Region(args) => commands::region::run(args),
        Commands::Panel(args) => commands::panel::run(args),
        Commands::Lookup(args) => commands::lookup::run(args),
        Commands::TopHwe(args) => commands::rank::run_hwe(args),
        Commands::TopChi2(args) => commands::rank::run_chi2(args),
        Commands::Kinship(args) => commands::kinship::run(args),
        Commands::SexCheck(args) => commands::sex_check::run(args),
        Commands::Prs(args) => commands::prs::run(args),
        Commands::Inherit(args) => commands::inherit::run(args),
    }
}
