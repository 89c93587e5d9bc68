use anyhow::{Context, Result};
use std::cmp::Ordering;

/// Resize a grow-only scratch buffer, reporting allocation failure instead
/// of aborting. The buffer never shrinks.
pub(crate) fn grow_to<T: Clone + Default>(v: &mut Vec<T>, len: usize) -> Result<()> {
    if len > v.capacity() {
        v.try_reserve(len - v.len())
            .context("out of memory growing scratch buffer")?;
    }
    if len > v.len() {
        v.resize(len, T::default());
    }
    Ok(())
}

/// Diagonal of cell (a, b) in the internal `b - a` convention used by
/// seeding, trapezoids, and the extension driver.
#[inline]
pub(crate) fn diag_of(b: i32, a: i32) -> i32 {
    b - a
}

/// Convert an internal `b - a` diagonal to the reported `a - b`
/// convention. Note that this swaps low and high bounds.
#[inline]
pub(crate) fn flip_diag(d: i32) -> i32 {
    -d
}

/// A maximal local alignment segment between sequences A and B.
///
/// Coordinates are 0-based and exclusive at the end, expressed on the
/// original strands of both sequences. A segment found against the reverse
/// complement of B has `b_begin > b_end`; `is_reverse()` reports this.
/// `low_diag`/`high_diag` bound the diagonals (a − b) the underlying
/// extension touched, usable as a compatibility corridor by callers that
/// chain or merge segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSegment {
    pub a_begin: i32,
    pub a_end: i32,
    pub b_begin: i32,
    pub b_end: i32,
    pub low_diag: i32,
    pub high_diag: i32,
    /// Extension score; the deduplicator marks losers with a negative score
    /// before compaction, so surviving segments always carry `score >= 0`.
    pub score: i32,
    /// Implied fraction of differing columns, in [0,1].
    pub error_rate: f64,
}

impl LocalSegment {
    /// Whether this segment was found in the reverse-complement orientation.
    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.b_end < self.b_begin
    }

    /// Combined extent on both axes; the deduplicator prefers longer
    /// segments among duplicates within the error budget.
    #[inline]
    pub fn combined_len(&self) -> i32 {
        (self.b_end - self.b_begin).abs() + (self.a_end - self.a_begin).abs()
    }
}

/// Order segments by their begin coordinates, A first.
pub fn by_begin(x: &LocalSegment, y: &LocalSegment) -> Ordering {
    (x.a_begin, x.b_begin).cmp(&(y.a_begin, y.b_begin))
}

/// Order segments by their end coordinates, A first.
pub fn by_end(x: &LocalSegment, y: &LocalSegment) -> Ordering {
    (x.a_end, x.b_end).cmp(&(y.a_end, y.b_end))
}
