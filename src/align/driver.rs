//! Divide-and-conquer alignment of trapezoid corridors.
//!
//! Each corridor is anchored at its B midpoint: a forward extension finds
//! the best end point, a reverse extension from there finds the best start
//! point, and the resulting local segment is recorded if it meets the
//! caller's length and error bounds. Corridors the segment explains are
//! skipped, and the sub-corridors above and below it are pushed back on an
//! explicit work stack.

use anyhow::{Context, Result};
use log::trace;

use crate::align::extend::{trace_forward, trace_reverse, DpScratch};
use crate::common::{flip_diag, grow_to, LocalSegment};
use crate::config::{CostModel, SeedSpec};
use crate::sequence::reverse_complement_into;
use crate::trap::Trapezoid;

/// Scratch state for one aligner pass, reused across calls.
#[derive(Debug, Default)]
pub struct AlignScratch {
    pub dp: DpScratch,
    stack: Vec<(Trapezoid, usize)>,
    covered: Vec<bool>,
    a_rc: Vec<u8>,
    b_rc: Vec<u8>,
    rc_ready: bool,
}

/// An anchored extension result, in the internal b - a diagonal
/// convention, before length/error acceptance.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    a_begin: i32,
    a_end: i32,
    b_begin: i32,
    b_end: i32,
    lo_diag: i32,
    hi_diag: i32,
    score: i32,
}

/// Align every uncovered corridor, appending accepted segments to `segs`.
/// `traps` is re-sorted by `bot`; `comp` marks the reverse-complement pass
/// and controls the B coordinate translation of recorded segments.
#[allow(clippy::too_many_arguments)]
pub fn align_trapezoids(
    a: &[u8],
    b: &[u8],
    traps: &mut Vec<Trapezoid>,
    comp: bool,
    min_len: i32,
    max_diff: f64,
    spec: &SeedSpec,
    cost: &CostModel,
    scratch: &mut AlignScratch,
    segs: &mut Vec<LocalSegment>,
) -> Result<()> {
    let k = spec.kmer_len as i32;
    let b_len = b.len() as i32;

    traps.sort_by_key(|t| t.bot);
    scratch.dp.prepare(a.len())?;
    scratch.stack.clear();
    scratch.rc_ready = false;
    grow_to(&mut scratch.covered, traps.len())?;
    scratch.covered[..traps.len()].fill(false);

    for origin in 0..traps.len() {
        if scratch.covered[origin] || traps[origin].b_span() < k {
            continue;
        }
        scratch.stack.push((traps[origin], origin));

        while let Some((t, cur)) = scratch.stack.pop() {
            let anchor = resolve_anchor(a, b, &t, cost, scratch)?;
            trace!(
                "corridor [{},{}]x[{},{}] -> ({},{})..({},{}) score {}",
                t.bot,
                t.top,
                t.lft,
                t.rgt,
                anchor.a_begin,
                anchor.b_begin,
                anchor.a_end,
                anchor.b_end,
                anchor.score
            );

            let mut ltrp = t;
            ltrp.top = t.top.min(anchor.b_begin) - cost.max_igap;
            let mut htrp = t;
            htrp.bot = t.bot.max(anchor.b_end) + cost.max_igap;

            let seg_b = anchor.b_end - anchor.b_begin;
            let seg_a = anchor.a_end - anchor.a_begin;
            if seg_b >= min_len && seg_a >= min_len {
                let pcnt = (-anchor.score + cost.same_cost * seg_b) as f64
                    / (cost.match_cost() * seg_b) as f64;
                if pcnt <= max_diff {
                    mark_explained(traps, &mut scratch.covered, cur, &anchor);

                    let mut seg = LocalSegment {
                        a_begin: anchor.a_begin,
                        a_end: anchor.a_end,
                        b_begin: anchor.b_begin,
                        b_end: anchor.b_end,
                        // Diagonals to this point are b - a; flip on output.
                        low_diag: flip_diag(anchor.hi_diag),
                        high_diag: flip_diag(anchor.lo_diag),
                        score: anchor.score,
                        error_rate: pcnt,
                    };
                    if comp {
                        seg.b_begin = b_len - seg.b_begin;
                        seg.b_end = b_len - seg.b_end;
                        seg.low_diag += b_len;
                        seg.high_diag += b_len;
                    }
                    if segs.len() == segs.capacity() {
                        segs.try_reserve(segs.len() / 5 + 500)
                            .context("out of memory growing segment list")?;
                    }
                    segs.push(seg);
                }
            }

            // Leftovers above first so the piece below is resolved first.
            if htrp.top - htrp.bot > min_len {
                scratch.stack.push((htrp, cur));
            }
            if ltrp.top - ltrp.bot > min_len && ltrp.top < t.top - cost.max_igap {
                scratch.stack.push((ltrp, cur));
            }
        }
    }
    Ok(())
}

/// Run the forward/reverse extension pair anchored at the corridor's B
/// midpoint. The reverse pass is retried with a widened pruning factor
/// while it fails to reach back past the midpoint with a score below the
/// forward pass's; if it still starts past the midpoint (or the forward
/// pass went nowhere), the whole anchor is retried on mirrored sequences
/// so a low-scoring stretch near the midpoint cannot hide a small segment.
fn resolve_anchor(
    a: &[u8],
    b: &[u8],
    t: &Trapezoid,
    cost: &CostModel,
    scratch: &mut AlignScratch,
) -> Result<Anchor> {
    let mid = (t.bot + t.top) / 2;

    // Rows over B, columns over A: a = b - diagonal.
    let lend = trace_forward(b, a, mid, mid - t.rgt, mid - t.lft, cost, &mut scratch.dp);
    let (hend, x) = converge_reverse(b, a, mid, &lend, cost, &mut scratch.dp);

    if hend.row > mid + x * cost.max_igap || lend.row == mid {
        return mirrored_anchor(a, b, t, cost, scratch);
    }

    Ok(Anchor {
        a_begin: hend.col,
        a_end: lend.col,
        b_begin: hend.row,
        b_end: lend.row,
        lo_diag: hend.lo_diag,
        hi_diag: hend.hi_diag,
        score: hend.score,
    })
}

/// Reverse extension from the forward end point, widening the pruning
/// factor until it reaches back past the midpoint or its score catches up.
fn converge_reverse(
    rows: &[u8],
    cols: &[u8],
    mid: i32,
    lend: &crate::align::extend::DpEnd,
    cost: &CostModel,
    dp: &mut DpScratch,
) -> (crate::align::extend::DpEnd, i32) {
    let mut x = 0;
    loop {
        x += 1;
        let hend = trace_reverse(
            rows,
            cols,
            lend.row,
            lend.col,
            lend.col,
            mid + cost.max_igap,
            cost.block_cost() + 2 * x * cost.diff_cost,
            cost,
            dp,
        );
        if !(hend.row > mid + x * cost.max_igap && hend.score < lend.score) {
            return (hend, x);
        }
    }
}

/// Retry the anchor with both sequences reverse-complemented and every
/// coordinate mirrored, then map the result back.
fn mirrored_anchor(
    a: &[u8],
    b: &[u8],
    t: &Trapezoid,
    cost: &CostModel,
    scratch: &mut AlignScratch,
) -> Result<Anchor> {
    let a_len = a.len() as i32;
    let b_len = b.len() as i32;

    if !scratch.rc_ready {
        reverse_complement_into(a, &mut scratch.a_rc);
        reverse_complement_into(b, &mut scratch.b_rc);
        scratch.rc_ready = true;
    }

    let mid = b_len - ((t.bot + t.top) / 2) - 1;
    let rgt = b_len - a_len - t.lft;
    let lft = b_len - a_len - t.rgt;

    let (a_rc, b_rc, dp) = (&scratch.a_rc, &scratch.b_rc, &mut scratch.dp);
    let lend = trace_forward(b_rc, a_rc, mid, mid - rgt, mid - lft, cost, dp);
    let (hend, _) = converge_reverse(b_rc, a_rc, mid, &lend, cost, dp);

    Ok(Anchor {
        a_begin: a_len - lend.col,
        a_end: a_len - hend.col,
        b_begin: b_len - lend.row,
        b_end: b_len - hend.row,
        lo_diag: b_len - a_len - hend.hi_diag,
        hi_diag: b_len - a_len - hend.lo_diag,
        score: hend.score,
    })
}

/// Mark later corridors whose span and diagonal range the accepted segment
/// covers at least 99% of; they would only rediscover it.
fn mark_explained(traps: &[Trapezoid], covered: &mut [bool], cur: usize, anchor: &Anchor) {
    for (j, t) in traps.iter().enumerate().skip(cur + 1) {
        if t.bot >= anchor.b_end {
            break;
        }
        let tb = t.top - t.bot + 1;
        let ta = t.rgt - t.lft + 1;
        let lo = t.lft.max(anchor.lo_diag);
        let hi = t.rgt.min(anchor.hi_diag);
        if lo > hi {
            continue;
        }
        let diag_overlap = hi - lo + 1;
        let span_overlap = if t.top > anchor.b_end {
            anchor.b_end - t.bot + 1
        } else {
            tb
        };
        if (diag_overlap as f64 / ta as f64) * (span_overlap as f64 / tb as f64) > 0.99 {
            covered[j] = true;
        }
    }
}
