//! VCF ingestion.
//!
//! Streams a plain or gzip-compressed VCF text file into variant rows.
//! Only hard-call GT fields are interpreted; multi-allelic records keep
//! their first alt allele. Genotypes against any other alt allele of the
//! same record become missing, so the 2-bit encoding stays biallelic.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use tracing::{debug, info};

use crate::genotype::{Genotype, GenotypeRow};
use crate::matrix::VariantRecord;
use crate::variant::{Chromosome, VariantSite};

/// Parsed VCF body: sample names in header order plus variant rows.
#[derive(Debug, Clone)]
pub struct VcfContents {
    pub sample_names: Vec<String>,
    pub records: Vec<VariantRecord>,
}

/// Read a VCF file, transparently decompressing `.gz` / `.bgz` paths.
pub fn read_vcf(path: &Path) -> Result<VcfContents> {
    let file =
        File::open(path).with_context(|| format!("failed to open VCF: {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let contents = if matches!(ext, "gz" | "bgz") {
        parse_vcf(BufReader::new(MultiGzDecoder::new(file)))?
    } else {
        parse_vcf(BufReader::new(file))?
    };
    info!(
        path = %path.display(),
        n_samples = contents.sample_names.len(),
        n_variants = contents.records.len(),
        "read VCF"
    );
    Ok(contents)
}

/// Parse VCF text from any reader.
pub fn parse_vcf<R: Read>(reader: BufReader<R>) -> Result<VcfContents> {
    let mut sample_names: Option<Vec<String>> = None;
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("failed to read VCF line")?;
        if line.starts_with("##") || line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('#') {
            let fields: Vec<&str> = rest.split('\t').collect();
            if fields.len() < 10 {
                bail!("VCF header has no sample columns");
            }
            sample_names = Some(fields[9..].iter().map(|s| s.to_string()).collect());
            continue;
        }
        let samples = sample_names
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("VCF data line before #CHROM header"))?;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 9 + samples.len() {
            bail!(
                "VCF line {}: expected {} fields, got {}",
                lineno + 1,
                9 + samples.len(),
                fields.len()
            );
        }
        // contigs outside chr1-22/X/Y/MT are skipped, not an error
        let chrom = match Chromosome::from_str(fields[0]) {
            Ok(c) => c,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let pos: u32 = fields[1]
            .parse()
            .with_context(|| format!("VCF line {}: bad position", lineno + 1))?;
        let ref_allele = fields[3];
        let alt_allele = fields[4]
            .split(',')
            .next()
            .filter(|a| *a != "." && !a.is_empty())
            .ok_or_else(|| anyhow::anyhow!("VCF line {}: no alt allele", lineno + 1))?;

        let format_fields: Vec<&str> = fields[8].split(':').collect();
        let gt_idx = format_fields
            .iter()
            .position(|&f| f == "GT")
            .ok_or_else(|| anyhow::anyhow!("VCF line {}: no GT in FORMAT", lineno + 1))?;

        let mut calls = Vec::with_capacity(samples.len());
        for sample_field in &fields[9..] {
            let gt = sample_field.split(':').nth(gt_idx).unwrap_or(".");
            calls.push(parse_gt(gt));
        }

        records.push(VariantRecord {
            site: VariantSite::at(chrom, pos, ref_allele, alt_allele),
            genotypes: GenotypeRow::from_calls(&calls),
        });
    }

    if skipped > 0 {
        debug!(skipped, "skipped records on unsupported contigs");
    }
    Ok(VcfContents {
        sample_names: sample_names.unwrap_or_default(),
        records,
    })
}

/// Parse a GT field against the first alt allele. Haploid calls ("1")
/// are promoted to homozygous; any allele index above 1 or any missing
/// allele yields a missing call.
fn parse_gt(gt: &str) -> Genotype {
    let sep = if gt.contains('|') { '|' } else { '/' };
    let mut copies = 0u32;
    let mut n_alleles = 0u32;
    for allele in gt.split(sep) {
        match allele {
            "0" => n_alleles += 1,
            "1" => {
                copies += 1;
                n_alleles += 1;
            }
            _ => return Genotype::Missing,
        }
    }
    match (n_alleles, copies) {
        (0, _) => Genotype::Missing,
        // haploid
        (1, 0) => Genotype::RefRef,
        (1, _) => Genotype::AltAlt,
        (_, 0) => Genotype::RefRef,
        (_, 1) => Genotype::RefAlt,
        _ => Genotype::AltAlt,
    }
}
