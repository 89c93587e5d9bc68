//! Counting-sort k-mer index over sequence A.
//!
//! `table` holds one exclusive prefix-sum slot per 2K-bit mer value plus a
//! terminator, and `tuples` holds every valid K-window start position of the
//! indexed sequence, bucket-sorted by mer value. Both buffers are reused
//! across builds.

use anyhow::Result;

use crate::common::grow_to;
use crate::config::SeedSpec;
use crate::sequence::base_code;

#[derive(Debug, Default)]
pub struct KmerIndex {
    kmer_len: usize,
    kmask: usize,
    /// `[0..=4^K]`: exclusive start of each mer's bucket in `tuples`.
    table: Vec<u32>,
    /// Valid window start positions, grouped by mer value.
    tuples: Vec<u32>,
}

/// Rolling 2-bit mer scanner. Tracks the most recent invalid symbol so that
/// only windows free of ambiguous bases are reported.
struct MerScan {
    kmer_len: isize,
    kmask: usize,
    code: usize,
    /// Earliest window start whose symbols are all valid.
    valid_from: isize,
}

impl MerScan {
    /// Prime the scanner with the first K-1 symbols of `seq`.
    fn new(seq: &[u8], kmer_len: usize, kmask: usize) -> Self {
        let k = kmer_len as isize;
        let mut scan = Self {
            kmer_len: k,
            kmask,
            code: 0,
            valid_from: -k,
        };
        for (i, &b) in seq.iter().take(kmer_len - 1).enumerate() {
            match base_code(b) {
                Some(x) => scan.code = (scan.code << 2) | x,
                None => {
                    scan.code <<= 2;
                    scan.valid_from = i as isize - (k - 1);
                }
            }
        }
        scan
    }

    /// Feed the final symbol of the window starting at `start`; returns the
    /// window's mer value if every symbol in it is valid.
    #[inline]
    fn step(&mut self, start: usize, last: u8) -> Option<usize> {
        match base_code(last) {
            Some(x) => self.code = ((self.code << 2) | x) & self.kmask,
            None => {
                self.code = (self.code << 2) & self.kmask;
                self.valid_from = start as isize;
            }
        }
        if start as isize >= self.valid_from + self.kmer_len {
            Some(self.code)
        } else {
            None
        }
    }
}

impl KmerIndex {
    /// Build the index over `seq` in two linear passes: count valid windows
    /// per bucket, prefix-sum, then place positions consuming the prefix
    /// pointers and restore them. Sequences shorter than K yield an empty
    /// index.
    pub fn build(&mut self, seq: &[u8], spec: &SeedSpec) -> Result<()> {
        let k = spec.kmer_len;
        self.kmer_len = k;
        self.kmask = spec.bucket_count() - 1;

        grow_to(&mut self.table, self.kmask + 2)?;
        self.table[..=self.kmask + 1].fill(0);
        self.tuples.clear();
        if seq.len() < k {
            return Ok(());
        }
        let windows = seq.len() - k + 1;

        // Pass 1: per-bucket counts, offset by one slot.
        let mut scan = MerScan::new(seq, k, self.kmask);
        for i in 0..windows {
            if let Some(mer) = scan.step(i, seq[i + k - 1]) {
                self.table[mer + 1] += 1;
            }
        }
        for c in 1..=self.kmask + 1 {
            self.table[c] += self.table[c - 1];
        }

        let total = self.table[self.kmask + 1] as usize;
        grow_to(&mut self.tuples, total)?;

        // Pass 2: place positions, consuming the bucket pointers.
        let mut scan = MerScan::new(seq, k, self.kmask);
        for i in 0..windows {
            if let Some(mer) = scan.step(i, seq[i + k - 1]) {
                self.tuples[self.table[mer] as usize] = i as u32;
                self.table[mer] += 1;
            }
        }

        // Restore: shift pointers back down one bucket.
        for c in (0..=self.kmask).rev() {
            self.table[c + 1] = self.table[c];
        }
        self.table[0] = 0;
        Ok(())
    }

    /// All start positions in the indexed sequence whose window has the
    /// given mer value.
    #[inline]
    pub fn positions(&self, mer: usize) -> &[u32] {
        let lo = self.table[mer] as usize;
        let hi = self.table[mer + 1] as usize;
        &self.tuples[lo..hi]
    }

    /// Number of valid windows indexed.
    pub fn len(&self) -> usize {
        if self.table.is_empty() {
            0
        } else {
            self.table[self.kmask + 1] as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the valid K-windows of `seq`, yielding `(start, mer)` pairs.
    /// Both the index build and the hit finder scan sequences this way.
    pub(crate) fn scan_windows<'a>(
        seq: &'a [u8],
        spec: &SeedSpec,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        let k = spec.kmer_len;
        let kmask = spec.bucket_count() - 1;
        let windows = (seq.len() + 1).saturating_sub(k);
        let mut scan = MerScan::new(seq, k, kmask);
        (0..windows).filter_map(move |i| scan.step(i, seq[i + k - 1]).map(|mer| (i, mer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mer_of(seq: &[u8]) -> usize {
        seq.iter().fold(0, |c, &b| (c << 2) | base_code(b).unwrap())
    }

    #[test]
    fn test_build_places_all_windows() {
        let spec = SeedSpec::default();
        let mut idx = KmerIndex::default();
        let seq = b"ACGTACGTACGT";
        idx.build(seq, &spec).unwrap();
        assert_eq!(idx.len(), seq.len() - spec.kmer_len + 1);
        // ACGTA occurs at 0, 4.. every 4 positions up to 7.
        assert_eq!(idx.positions(mer_of(b"ACGTA")), &[0, 4]);
        assert_eq!(idx.positions(mer_of(b"CGTAC")), &[1, 5]);
        assert!(idx.positions(mer_of(b"AAAAA")).is_empty());
    }

    #[test]
    fn test_ambiguous_symbols_break_windows() {
        let spec = SeedSpec::default();
        let mut idx = KmerIndex::default();
        // N at position 5 invalidates windows starting in 1..=5.
        idx.build(b"ACGTANACGTA", &spec).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.positions(mer_of(b"ACGTA")), &[0, 6]);
    }

    #[test]
    fn test_short_sequence_is_empty_not_error() {
        let spec = SeedSpec::default();
        let mut idx = KmerIndex::default();
        idx.build(b"ACG", &spec).unwrap();
        assert!(idx.is_empty());
        idx.build(b"", &spec).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn test_rebuild_reuses_buffers() {
        let spec = SeedSpec::default();
        let mut idx = KmerIndex::default();
        idx.build(b"ACGTACGTACGTACGT", &spec).unwrap();
        idx.build(b"TTTTTT", &spec).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.positions(mer_of(b"TTTTT")), &[0, 1]);
    }
}
