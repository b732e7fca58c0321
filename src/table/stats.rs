//! Bucket occupancy statistics

use std::fmt;

/// Snapshot of how records are spread over buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    pub bucket_count: usize,
    pub element_count: usize,
    pub load_factor: f64,
    pub empty_buckets: usize,
    pub max_chain_length: usize,
    /// Mean over non-empty buckets only (0.0 when all are empty)
    pub avg_chain_length: f64,
}

impl TableStats {
    /// Compute stats from per-bucket chain lengths
    pub(crate) fn from_chain_lengths(lengths: impl Iterator<Item = usize>) -> Self {
        let mut bucket_count = 0;
        let mut element_count = 0;
        let mut empty_buckets = 0;
        let mut max_chain_length = 0;

        for len in lengths {
            bucket_count += 1;
            element_count += len;
            if len == 0 {
                empty_buckets += 1;
            } else {
                max_chain_length = max_chain_length.max(len);
            }
        }

        let occupied = bucket_count - empty_buckets;
        let avg_chain_length = if occupied > 0 {
            element_count as f64 / occupied as f64
        } else {
            0.0
        };
        let load_factor = if bucket_count > 0 {
            element_count as f64 / bucket_count as f64
        } else {
            0.0
        };

        Self {
            bucket_count,
            element_count,
            load_factor,
            empty_buckets,
            max_chain_length,
            avg_chain_length,
        }
    }

    /// Share of empty buckets, in percent
    pub fn empty_percent(&self) -> f64 {
        if self.bucket_count == 0 {
            0.0
        } else {
            100.0 * self.empty_buckets as f64 / self.bucket_count as f64
        }
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash Table Statistics:")?;
        writeln!(f, "  Bucket Count: {}", self.bucket_count)?;
        writeln!(f, "  Element Count: {}", self.element_count)?;
        writeln!(f, "  Load Factor: {:.3}", self.load_factor)?;
        writeln!(
            f,
            "  Empty Buckets: {} ({:.1}%)",
            self.empty_buckets,
            self.empty_percent()
        )?;
        writeln!(f, "  Max Chain Length: {}", self.max_chain_length)?;
        write!(f, "  Avg Chain Length: {:.2}", self.avg_chain_length)
    }
}
