//! Diagonal chaining of shared k-mers into hit records.
//!
//! Every shared mer between A and B touches a band of adjacent diagonals
//! (tolerating small indels); a diagonal whose running mer count reaches the
//! seed threshold before its chain disconnects becomes a `HitRecord`. This
//! turns cheap, numerous shared mers into few, filtered hit chains.

use anyhow::{Context, Result};

use crate::common::{diag_of, grow_to};
use crate::config::SeedSpec;
use crate::seed::index::KmerIndex;

/// A chain of nearby shared mers on (close to) one diagonal.
///
/// The diagonal convention throughout seeding and trapezoid processing is
/// `b - a`; it is flipped to `a - b` only when a segment is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    pub diagonal: i32,
    /// B position of the start of the chain (inclusive).
    pub b_start: i32,
    /// B position of the end of the chain (exclusive).
    pub b_finish: i32,
}

/// Per-diagonal running accumulator, reused across calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagRecord {
    min_b: i32,
    max_b: i32,
    count: i32,
}

/// Diagonal accumulator array spanning `[-len(A), len(B) + max_error]`,
/// indexed with an offset of `len(A)`.
#[derive(Debug, Default)]
pub struct DiagScratch {
    recs: Vec<DiagRecord>,
}

impl DiagScratch {
    fn reset(&mut self, a_len: i32, b_len: i32, max_error: i32) -> Result<()> {
        let span = (a_len + b_len + max_error + 1) as usize;
        grow_to(&mut self.recs, span)?;
        for rec in &mut self.recs[..span] {
            rec.count = 0;
            rec.max_b = 0;
        }
        Ok(())
    }
}

#[inline]
fn push_hit(out: &mut Vec<HitRecord>, hit: HitRecord) -> Result<()> {
    if out.len() == out.capacity() {
        out.try_reserve(out.len() / 5 + 5000)
            .context("out of memory growing hit list")?;
    }
    out.push(hit);
    Ok(())
}

/// Find all hit chains of B against the index of A. `out` is cleared and
/// filled sorted by `b_start`.
pub fn find_hits(
    a_len: i32,
    b: &[u8],
    index: &KmerIndex,
    spec: &SeedSpec,
    scratch: &mut DiagScratch,
    out: &mut Vec<HitRecord>,
) -> Result<()> {
    let b_len = b.len() as i32;
    let k = spec.kmer_len as i32;
    let kthresh = spec.kthresh();
    let disconnect = spec.disconnect();

    out.clear();
    scratch.reset(a_len, b_len, spec.max_error)?;

    for (i, mer) in KmerIndex::scan_windows(b, spec) {
        let i = i as i32;
        for &apos in index.positions(mer) {
            // Base diagonal of this mer pair; the chain accumulators for
            // the next max_error diagonals absorb it too.
            let base = diag_of(i, apos as i32);
            for e in 0..=spec.max_error {
                let rec = &mut scratch.recs[(base + e + a_len) as usize];
                if rec.max_b < i - disconnect {
                    if rec.count >= kthresh {
                        push_hit(
                            out,
                            HitRecord {
                                diagonal: base,
                                b_start: rec.min_b,
                                b_finish: rec.max_b + k,
                            },
                        )?;
                    }
                    rec.count = 0;
                }
                if rec.count == 0 {
                    rec.min_b = i;
                }
                rec.count += 1;
                rec.max_b = i;
            }
        }
    }

    // Flush chains still alive at the end of B.
    for d in -a_len..=b_len + spec.max_error {
        let rec = &scratch.recs[(d + a_len) as usize];
        if rec.count >= kthresh {
            push_hit(
                out,
                HitRecord {
                    diagonal: d,
                    b_start: rec.min_b,
                    b_finish: rec.max_b + k,
                },
            )?;
        }
    }

    out.sort_by_key(|h| h.b_start);
    Ok(())
}
