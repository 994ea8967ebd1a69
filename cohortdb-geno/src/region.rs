//! Genomic region lookup over the sorted variant rows.
//!
//! A region is a 1-based inclusive interval on one chromosome. Lookup
//! binary-searches the chromosome's row range, then widens the scan
//! start by the widest site span on that chromosome so that deletions
//! starting left of the interval are still considered.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matrix::GenotypeMatrix;
use crate::variant::Chromosome;

/// A 1-based inclusive interval on a single chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub chrom: Chromosome,
    pub start: u32,
    pub end: u32,
}

impl Region {
    pub fn new(chrom: Chromosome, start: u32, end: u32) -> Region {
        Region { chrom, start, end }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    /// Parse "chr:start-end", e.g. "17:7565097-7590856".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chrom, span) = s
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("malformed region: {}", s))?;
        let (start, end) = span
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("malformed region: {}", s))?;
        let region = Region {
            chrom: chrom.parse()?,
            start: start.trim().parse()?,
            end: end.trim().parse()?,
        };
        if region.start > region.end {
            anyhow::bail!("region start after end: {}", s);
        }
        Ok(region)
    }
}

/// Row indices whose sites overlap the region, in row order.
pub fn rows_in_region(matrix: &GenotypeMatrix, region: &Region) -> Vec<usize> {
    let span = matrix.chrom_span(region.chrom);
    if span.is_empty() {
        return Vec::new();
    }
    let records = matrix.records();
    // Earliest start that could still overlap, given the widest site.
    let min_start = region.start.saturating_sub(matrix.max_site_span(region.chrom));
    let lo = span.start
        + records[span.clone()].partition_point(|rec| rec.site.start < min_start);

    let mut rows = Vec::new();
    for (i, rec) in records[lo..span.end].iter().enumerate() {
        if rec.site.start > region.end {
            break;
        }
        if rec.site.overlaps(region.start, region.end) {
            rows.push(lo + i);
        }
    }
    rows
}

/// Union of row indices over several regions, deduplicated and sorted.
/// Overlapping regions therefore never report a row twice.
pub fn rows_in_regions(matrix: &GenotypeMatrix, regions: &[Region]) -> Vec<usize> {
    let mut rows: BTreeSet<usize> = BTreeSet::new();
    for region in regions {
        rows.extend(rows_in_region(matrix, region));
    }
    rows.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::{SampleInfo, Sex};
    use crate::genotype::{Genotype, GenotypeRow};
    use crate::matrix::VariantRecord;
    use crate::variant::{Assembly, VariantSite};

    fn matrix() -> GenotypeMatrix {
        let calls = [Genotype::RefAlt];
        let row = |chrom, pos, r: &str, a: &str| VariantRecord {
            site: VariantSite::at(chrom, pos, r, a),
            genotypes: GenotypeRow::from_calls(&calls),
        };
        GenotypeMatrix::load(
            Assembly::Grch37,
            vec![SampleInfo::new("s1", Sex::Unknown)],
            vec![
                row(Chromosome::Chr1, 100, "A", "G"),
                // deletion spanning 200..=204
                row(Chromosome::Chr1, 200, "ACGTA", "A"),
                row(Chromosome::Chr1, 300, "C", "T"),
                row(Chromosome::Chr2, 100, "G", "C"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_region() {
        let r: Region = "17:7565097-7590856".parse().unwrap();
        assert_eq!(r.chrom, Chromosome::Chr17);
        assert_eq!(r.start, 7565097);
        assert_eq!(r.end, 7590856);
        assert!("17:10-5".parse::<Region>().is_err());
        assert!("17:10".parse::<Region>().is_err());
    }

    #[test]
    fn test_rows_in_region_overlap_semantics() {
        let m = matrix();
        // interval starting inside the deletion still finds it
        let rows = rows_in_region(&m, &Region::new(Chromosome::Chr1, 203, 203));
        assert_eq!(rows, vec![1]);
        // interval covering everything on chr1
        let rows = rows_in_region(&m, &Region::new(Chromosome::Chr1, 1, 1000));
        assert_eq!(rows, vec![0, 1, 2]);
        // no rows on chr3
        assert!(rows_in_region(&m, &Region::new(Chromosome::Chr3, 1, 1000)).is_empty());
        // chr2 rows do not leak into chr1 queries
        let rows = rows_in_region(&m, &Region::new(Chromosome::Chr2, 1, 1000));
        assert_eq!(rows, vec![3]);
    }

    #[test]
    fn test_rows_in_regions_union() {
        let m = matrix();
        let rows = rows_in_regions(
            &m,
            &[
                Region::new(Chromosome::Chr1, 100, 250),
                Region::new(Chromosome::Chr1, 200, 300),
            ],
        );
        assert_eq!(rows, vec![0, 1, 2]);
    }
}
