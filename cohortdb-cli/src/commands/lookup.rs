//! Look up a single variant's allele statistics (beacon-style query).
//!
//! cohortdb lookup --store trio.cdb --assembly GRCh37 \
//!     --chrom 1 --pos 880238 --ref A --alt G

use anyhow::Result;
use clap::Args;

use cohortdb_geno::variant::{Chromosome, VariantSite};

#[derive(Args)]
pub struct LookupArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Chromosome
    #[arg(long)]
    chrom: String,

    /// 1-based position
    #[arg(long)]
    pos: u32,

    /// Reference allele
    #[arg(long = "ref")]
    ref_allele: String,

    /// Alternate allele
    #[arg(long = "alt")]
    alt_allele: String,
}

pub fn run(args: LookupArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let chrom: Chromosome = args.chrom.parse()?;
    let site = VariantSite::at(chrom, args.pos, &args.ref_allele, &args.alt_allele);

    match engine.variant_lookup(super::parse_assembly(&args.assembly)?, &site) {
        Some((site, stats)) => {
            println!(
                "{}\taf={:.4} ac={} an={} homc={} hetc={} misc={} homfc={}",
                site, stats.af, stats.ac, stats.an, stats.homc, stats.hetc, stats.misc,
                stats.homfc
            );
        }
        None => println!("not found"),
    }
    Ok(())
}
