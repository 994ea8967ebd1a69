//! Inheritance-pattern trio filters.
//!
//! cohortdb inherit --store trio.cdb --assembly GRCh37 --pattern de-novo \
//!     --mother HG004 --father HG003 --proband HG002

use anyhow::Result;
use clap::Args;

use cohortdb_core::engine::InheritanceQuery;
use cohortdb_core::exec::CancelToken;
use cohortdb_core::inherit::{AffectedParent, InheritanceModel};
use cohortdb_core::request::{ExecMode, Trio};

#[derive(Args)]
pub struct InheritArgs {
    /// Store file (.cdb)
    #[arg(long)]
    store: String,

    /// Reference assembly of the query
    #[arg(long, default_value = "unspecified")]
    assembly: String,

    /// Pattern: de-novo, het-dominant-mother, het-dominant-father,
    /// hom-recessive
    #[arg(long)]
    pattern: String,

    /// Mother sample name
    #[arg(long)]
    mother: String,

    /// Father sample name
    #[arg(long)]
    father: String,

    /// Proband (child) sample name
    #[arg(long)]
    proband: String,

    /// Print matching variants instead of just the count
    #[arg(long)]
    list: bool,

    /// Force single-threaded sequential execution
    #[arg(long)]
    seq: bool,
}

fn parse_pattern(s: &str) -> Result<InheritanceModel> {
    match s {
        "de-novo" => Ok(InheritanceModel::DeNovo),
        "het-dominant-mother" => Ok(InheritanceModel::HetDominant(AffectedParent::Mother)),
        "het-dominant-father" => Ok(InheritanceModel::HetDominant(AffectedParent::Father)),
        "hom-recessive" => Ok(InheritanceModel::HomRecessive),
        other => anyhow::bail!("unknown inheritance pattern: {}", other),
    }
}

pub fn run(args: InheritArgs) -> Result<()> {
    let engine = super::open_engine(&args.store)?;
    let req = InheritanceQuery {
        assembly: super::parse_assembly(&args.assembly)?,
        trio: Trio {
            mother: args.mother,
            father: args.father,
            proband: args.proband,
        },
        model: parse_pattern(&args.pattern)?,
        mode: ExecMode::from_seq_flag(args.seq),
    };
    let hits = engine.inheritance(&req, &CancelToken::new())?;
    if args.list {
        super::region::print_hits(&hits);
    } else {
        println!("{} variants", hits.len());
    }
    Ok(())
}
