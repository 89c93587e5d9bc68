//! Trapezoidal match corridors in (B-position x diagonal) space.
//!
//! Hit chains that lie close together in both B extent and diagonal are
//! merged into trapezoids; each trapezoid is a corridor the extension
//! aligner later anchors in. Trapezoids are plain value structs held in
//! `Vec`s scoped to one alignment call.

use crate::config::{CostModel, SeedSpec, DPADDING};
use crate::seed::HitRecord;
use crate::sequence::is_valid;

/// A corridor bounded by `[bot, top]` on the B axis and `[lft, rgt]` in
/// diagonals (b - a convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trapezoid {
    pub bot: i32,
    pub top: i32,
    pub lft: i32,
    pub rgt: i32,
}

impl Trapezoid {
    fn from_hit(h: &HitRecord) -> Self {
        Self {
            bot: h.b_start,
            top: h.b_finish,
            lft: h.diagonal,
            rgt: h.diagonal,
        }
    }

    /// A-axis extent implied by the B extent and the diagonal bounds.
    #[inline]
    pub fn a_range(&self) -> (i32, i32) {
        (self.bot - self.rgt, self.top - self.lft)
    }

    #[inline]
    pub fn b_span(&self) -> i32 {
        self.top - self.bot
    }
}

/// Merge hit chains (sorted by `b_start`) into trapezoids.
///
/// `open` is kept ordered by diagonal. Per hit: retire any open trapezoid
/// whose top lies more than `bpadding` below the hit (it can no longer
/// grow), then either widen the diagonally-nearest compatible trapezoid,
/// coalescing with its neighbor when the widening brings them within
/// `DPADDING`, or open a new one. `open` and `out` are reused buffers.
pub fn build_trapezoids(
    hits: &[HitRecord],
    bpadding: i32,
    open: &mut Vec<Trapezoid>,
    out: &mut Vec<Trapezoid>,
) {
    open.clear();
    out.clear();

    for hit in hits {
        // Retire corridors the sweep has passed.
        let mut w = 0;
        for r in 0..open.len() {
            if open[r].top < hit.b_start - bpadding {
                out.push(open[r]);
            } else {
                open[w] = open[r];
                w += 1;
            }
        }
        open.truncate(w);

        // Find the first open trapezoid not entirely left of the hit.
        let mut p = 0;
        while p < open.len() && hit.diagonal > open[p].rgt + DPADDING {
            p += 1;
        }

        if p < open.len() && hit.diagonal >= open[p].lft - DPADDING {
            let t = &mut open[p];
            t.lft = t.lft.min(hit.diagonal);
            t.rgt = t.rgt.max(hit.diagonal);
            t.top = t.top.max(hit.b_finish);

            if p > 0 && open[p - 1].rgt + DPADDING >= open[p].lft {
                let absorbed = open.remove(p);
                let t = &mut open[p - 1];
                t.rgt = absorbed.rgt;
                t.bot = t.bot.min(absorbed.bot);
                t.top = t.top.max(absorbed.top);
            } else if p + 1 < open.len() && open[p + 1].lft - DPADDING <= open[p].rgt {
                let absorbed = open.remove(p + 1);
                let t = &mut open[p];
                t.rgt = absorbed.rgt;
                t.bot = t.bot.min(absorbed.bot);
                t.top = t.top.max(absorbed.top);
            }
        } else {
            open.insert(p, Trapezoid::from_hit(hit));
        }
    }

    out.append(open);
}

/// Split trapezoids at runs of `max_igap` or more ambiguous symbols on
/// either axis, discarding pieces whose B span falls below K. Alignments
/// are not trusted to bridge long ambiguous stretches, so corridors end at
/// them.
pub fn split_trapezoids(
    a: &[u8],
    b: &[u8],
    traps: &mut Vec<Trapezoid>,
    spec: &SeedSpec,
    cost: &CostModel,
    scratch: &mut Vec<Trapezoid>,
) {
    let max_igap = cost.max_igap;
    let k = spec.kmer_len as i32;

    scratch.clear();
    for i in 0..traps.len() {
        let mut t = traps[i];
        split_on_b(b, &mut t, max_igap, scratch);
        scratch.push(t);
    }

    traps.clear();
    for i in 0..scratch.len() {
        let t = scratch[i];
        if t.b_span() < k {
            continue;
        }
        split_on_a(a, t, max_igap, traps);
    }
    traps.retain(|t| t.b_span() >= k);
}

/// Cut a trapezoid at long invalid runs in its padded B range; finished
/// lower pieces go to `out`, `t` keeps the remainder.
fn split_on_b(b: &[u8], t: &mut Trapezoid, max_igap: i32, out: &mut Vec<Trapezoid>) {
    let b_len = b.len() as i32;
    let mut lag = (t.bot - max_igap + 1).max(0);
    let lst = (t.top + max_igap).min(b_len);

    for i in lag..lst {
        if is_valid(b[i as usize]) {
            if i - lag >= max_igap {
                if lag - t.bot > 0 {
                    out.push(Trapezoid { top: lag, ..*t });
                }
                t.bot = i;
            }
            lag = i + 1;
        }
    }
    if lst - lag >= max_igap {
        t.top = lag;
    }
}

/// Cut a trapezoid at long invalid runs in its implied A range. Each
/// finished piece is clipped inward on both axes and to the diagonal
/// midpoint of its A window.
fn split_on_a(a: &[u8], t: Trapezoid, max_igap: i32, out: &mut Vec<Trapezoid>) {
    let a_len = a.len() as i32;
    let (a_bot, a_top) = t.a_range();

    let mut cur = t;
    let mut lag = (a_bot - max_igap + 1).max(0);
    let lst = (a_top + max_igap).min(a_len);
    let mut lclip = a_bot;

    for i in lag..lst {
        if is_valid(a[i as usize]) {
            if i - lag >= max_igap {
                if lag > lclip {
                    let mut piece = cur;
                    clip_to_a_window(&mut piece, lclip, lag);
                    out.push(piece);
                }
                lclip = i;
            }
            lag = i + 1;
        }
    }
    if lst - lag < max_igap {
        lag = a_top;
    }
    clip_to_a_window(&mut cur, lclip, lag);
    out.push(cur);
}

/// Restrict a trapezoid to the A window `[lo, hi]`: raise/lower the B
/// bounds through the diagonal extremes, then narrow the diagonals around
/// the B midpoint.
fn clip_to_a_window(t: &mut Trapezoid, lo: i32, hi: i32) {
    t.bot = t.bot.max(lo + t.lft);
    t.top = t.top.min(hi + t.rgt);
    let mid = (t.bot + t.top) / 2;
    t.lft = t.lft.max(mid - hi);
    t.rgt = t.rgt.min(mid - lo);
}
