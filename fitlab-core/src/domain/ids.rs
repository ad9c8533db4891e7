//! Dataset identity: gene count plus fitness-function tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one mutation dataset and its cached summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId {
    pub gene_count: u32,
    /// Fitness-function tag, e.g. `ff4`.
    pub fitness_fn: String,
}

impl DatasetId {
    pub fn new(gene_count: u32, fitness_fn: impl Into<String>) -> Self {
        Self {
            gene_count,
            fitness_fn: fitness_fn.into(),
        }
    }

    /// Number of bits in the genome: `g × 2^(g−1)`.
    pub fn genome_bits(&self) -> u32 {
        genome_bits(self.gene_count)
    }

    /// Cache key of the summary table, e.g. `m4_ff4_final`.
    pub fn summary_key(&self) -> String {
        format!("m{}_{}_final", self.gene_count, self.fitness_fn)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}/{}", self.gene_count, self.fitness_fn)
    }
}

/// Largest gene count the summaries support. Distance groups are allocated
/// up front, so this also bounds memory.
pub const MAX_GENE_COUNT: u32 = 24;

/// Genome length in bits for `gene_count` genes, saturating at `u32::MAX`.
pub fn genome_bits(gene_count: u32) -> u32 {
    checked_genome_bits(gene_count).unwrap_or(u32::MAX)
}

/// Genome length in bits, or `None` when it does not fit in a `u32`.
pub fn checked_genome_bits(gene_count: u32) -> Option<u32> {
    if gene_count == 0 {
        return Some(0);
    }
    1u32.checked_shl(gene_count - 1)?.checked_mul(gene_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genome_bits_match_published_normalizers() {
        assert_eq!(genome_bits(4), 32);
        assert_eq!(genome_bits(5), 80);
        assert_eq!(genome_bits(6), 192);
        assert_eq!(genome_bits(0), 0);
    }

    #[test]
    fn large_gene_counts_do_not_overflow() {
        assert_eq!(checked_genome_bits(MAX_GENE_COUNT), Some(24 << 23));
        assert_eq!(checked_genome_bits(28), Some(28 << 27));
        assert_eq!(checked_genome_bits(29), None);
        assert_eq!(checked_genome_bits(33), None);
        assert_eq!(genome_bits(40), u32::MAX);
    }

    #[test]
    fn summary_key_format() {
        let id = DatasetId::new(5, "ff4");
        assert_eq!(id.summary_key(), "m5_ff4_final");
        assert_eq!(id.to_string(), "n5/ff4");
    }
}
