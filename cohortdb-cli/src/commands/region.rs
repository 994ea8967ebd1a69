//! Query variants in one or more genomic regions.
//!
//! cohortdb region --store trio.cdb --assembly GRCh37 \
//!     --region 1:880200-880238 --hom --het

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::{RegionQuery, VariantHit};
use cohortdb_core::request::GenotypeClasses;
use cohortdb_core::stats::allele::AlleleStats;
use cohortdb_geno::region::Region;

#[derive(Args)]
pub struct RegionArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query coordinates
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Region as chr:start-end; repeatable
    #[arg(long, required = true)]
    region: Vec<String>,

    /// Include homozygous-alt carriers
    #[arg(long)]
    hom: bool,

    /// Include heterozygous carriers
    #[arg(long)]
    het: bool,

    /// Keep only variants with this reference allele
    #[arg(long = "ref")]
    ref_allele: Option<String>,

    /// Keep only variants with this alternate allele
    #[arg(long = "alt")]
    alt_allele: Option<String>,

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

fn format_stats(s: &AlleleStats) -> String {
    format!(
        "af={:.4} ac={} an={} homc={} hetc={} misc={} homfc={}",
        s.af, s.ac, s.an, s.homc, s.hetc, s.misc, s.homfc
    )
}

pub(crate) fn print_hits(hits: &[VariantHit]) {
    for hit in hits {
        let mut line = format!("{}\t{}", hit.site, format_stats(&hit.stats));
        if let Some(vc) = &hit.vc_stats {
            line.push_str(&format!("\tvc[{}]", format_stats(vc)));
        }
        line.push_str(&format!("\tsamples={}", hit.samples.join(",")));
        println!("{}", line);
    }
    println!("{} variants", hits.len());
}

pub fn run(args: RegionArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let regions = args
        .region
        .iter()
        .map(|r| r.parse::<Region>())
        .collect::<Result<Vec<_>>>()?;

    let mut req = RegionQuery::new(
        super::parse_assembly(&args.assembly)?,
        regions,
        GenotypeClasses::from_flags(args.hom, args.het),
    );
    req.ref_filter = args.ref_allele;
    req.alt_filter = args.alt_allele;
    req.cohort = args.cohort;
    req.samples = args.sample;
    req.with_vc_stats = args.vc_stats;

    let hits = engine.region_query(&req)?;
    print_hits(&hits);
    Ok(())
}
