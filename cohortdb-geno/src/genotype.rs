//! Fixed-width genotype encoding.
//!
//! Each genotype cell is a 2-bit code, four cells per byte, giving O(1)
//! random access by (row, column) without per-row pointers. Hemizygous
//! calls on chrX are stored as homozygous by convention; the sex-aware
//! interpretation happens in the statistics layer.

use serde::{Deserialize, Serialize};

/// A single diploid genotype call against one alt allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Genotype {
    RefRef = 0,
    RefAlt = 1,
    AltAlt = 2,
    Missing = 3,
}

impl Genotype {
    /// Decode a 2-bit code.
    pub fn from_code(code: u8) -> Genotype {
        match code & 0b11 {
            0 => Genotype::RefRef,
            1 => Genotype::RefAlt,
            2 => Genotype::AltAlt,
            _ => Genotype::Missing,
        }
    }

    /// Number of alt allele copies (0 for missing).
    pub fn alt_copies(&self) -> u32 {
        match self {
            Genotype::RefAlt => 1,
            Genotype::AltAlt => 2,
            _ => 0,
        }
    }

    /// Whether the call carries at least one alt allele.
    pub fn carries_alt(&self) -> bool {
        matches!(self, Genotype::RefAlt | Genotype::AltAlt)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Genotype::Missing)
    }
}

/// One variant row: packed genotype codes for every sample column of
/// the containing matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeRow {
    packed: Vec<u8>,
    n_samples: usize,
}

impl GenotypeRow {
    /// Pack a slice of genotype calls, one per sample column.
    pub fn from_calls(calls: &[Genotype]) -> GenotypeRow {
        let mut packed = vec![0u8; calls.len().div_ceil(4)];
        for (i, gt) in calls.iter().enumerate() {
            packed[i / 4] |= (*gt as u8) << ((i % 4) * 2);
        }
        GenotypeRow {
            packed,
            n_samples: calls.len(),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Genotype for a sample column. Panics if out of range; callers
    /// index with columns resolved against the same matrix.
    pub fn get(&self, col: usize) -> Genotype {
        assert!(col < self.n_samples, "column {} out of range", col);
        Genotype::from_code(self.packed[col / 4] >> ((col % 4) * 2))
    }

    /// Iterate genotypes over all columns in column order.
    pub fn iter(&self) -> impl Iterator<Item = Genotype> + '_ {
        (0..self.n_samples).map(move |i| self.get(i))
    }
}
