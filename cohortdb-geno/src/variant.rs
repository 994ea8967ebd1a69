//! Variant identity: reference assembly, chromosome, coordinates, alleles.
//!
//! Coordinates are 1-based inclusive. Deletions span more than one base,
//! so `start <= end` always holds but `start < end` is possible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference genome assembly. `Unspecified` is the protocol default and
/// never matches loaded data: a query carrying it resolves to an empty
/// result set, by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Assembly {
    #[default]
    Unspecified,
    Grch37,
    Grch38,
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assembly::Unspecified => write!(f, "unspecified"),
            Assembly::Grch37 => write!(f, "GRCh37"),
            Assembly::Grch38 => write!(f, "GRCh38"),
        }
    }
}

impl FromStr for Assembly {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grch37" | "hg19" | "37" => Ok(Assembly::Grch37),
            "grch38" | "hg38" | "38" => Ok(Assembly::Grch38),
            "unspecified" | "" => Ok(Assembly::Unspecified),
            other => anyhow::bail!("unknown assembly: {}", other),
        }
    }
}

/// Human chromosome. The numeric discriminant doubles as the canonical
/// sort order for variant rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Chromosome {
    Chr1 = 1,
    Chr2,
    Chr3,
    Chr4,
    Chr5,
    Chr6,
    Chr7,
    Chr8,
    Chr9,
    Chr10,
    Chr11,
    Chr12,
    Chr13,
    Chr14,
    Chr15,
    Chr16,
    Chr17,
    Chr18,
    Chr19,
    Chr20,
    Chr21,
    Chr22,
    ChrX,
    ChrY,
    ChrMt,
}

impl Chromosome {
    /// All chromosomes in canonical order.
    pub const ALL: [Chromosome; 25] = [
        Chromosome::Chr1,
        Chromosome::Chr2,
        Chromosome::Chr3,
        Chromosome::Chr4,
        Chromosome::Chr5,
        Chromosome::Chr6,
        Chromosome::Chr7,
        Chromosome::Chr8,
        Chromosome::Chr9,
        Chromosome::Chr10,
        Chromosome::Chr11,
        Chromosome::Chr12,
        Chromosome::Chr13,
        Chromosome::Chr14,
        Chromosome::Chr15,
        Chromosome::Chr16,
        Chromosome::Chr17,
        Chromosome::Chr18,
        Chromosome::Chr19,
        Chromosome::Chr20,
        Chromosome::Chr21,
        Chromosome::Chr22,
        Chromosome::ChrX,
        Chromosome::ChrY,
        Chromosome::ChrMt,
    ];

    /// Whether this is chromosome X (hemizygosity accounting applies).
    pub fn is_x(&self) -> bool {
        matches!(self, Chromosome::ChrX)
    }

    /// Whether this is an autosome (chr1-chr22).
    pub fn is_autosome(&self) -> bool {
        !matches!(self, Chromosome::ChrX | Chromosome::ChrY | Chromosome::ChrMt)
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chromosome::ChrX => write!(f, "X"),
            Chromosome::ChrY => write!(f, "Y"),
            Chromosome::ChrMt => write!(f, "MT"),
            other => write!(f, "{}", *other as u8),
        }
    }
}

impl FromStr for Chromosome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("chr").unwrap_or(s);
        match s {
            "X" | "x" => Ok(Chromosome::ChrX),
            "Y" | "y" => Ok(Chromosome::ChrY),
            "MT" | "M" | "mt" | "m" => Ok(Chromosome::ChrMt),
            num => {
                let n: u8 = num
                    .parse()
                    .map_err(|_| anyhow::anyhow!("unknown chromosome: {}", s))?;
                if (1..=22).contains(&n) {
                    Ok(Chromosome::ALL[(n - 1) as usize])
                } else {
                    anyhow::bail!("chromosome out of range: {}", s)
                }
            }
        }
    }
}

/// Identity of a variant site: chromosome, 1-based inclusive span and
/// the ref/alt allele pair. Two datasets for different assemblies never
/// share row identity, so the assembly is not part of the site key; it
/// scopes the containing matrix instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantSite {
    pub chrom: Chromosome,
    pub start: u32,
    pub end: u32,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl VariantSite {
    /// Build a site from a 1-based position, deriving `end` from the
    /// reference allele length.
    pub fn at(chrom: Chromosome, pos: u32, ref_allele: &str, alt_allele: &str) -> Self {
        let end = pos + ref_allele.len().saturating_sub(1) as u32;
        VariantSite {
            chrom,
            start: pos,
            end,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
        }
    }

    /// Whether the site overlaps the 1-based inclusive interval.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start <= end && self.end >= start
    }
}

impl fmt::Display for VariantSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}>{}",
            self.chrom, self.start, self.end, self.ref_allele, self.alt_allele
        )
    }
}
