//! Banded, greedy, X-drop dynamic-programming extension.
//!
//! `trace_forward` and `trace_reverse` extend from a seed row through both
//! sequences with a rolling two-row DP. Cell scores follow
//! `max(diag + match?, up, left) - diff_cost`, so a matched column nets
//! `+same_cost` and every other column nets `-diff_cost`. Each row the
//! active column band is pruned to cells within the X-drop threshold of the
//! running best score and may widen by at most `max_igap` columns per side,
//! which bounds the indel size an extension can bridge.

use anyhow::Result;

use crate::common::grow_to;
use crate::config::CostModel;
use crate::sequence::bases_match;

/// Endpoint of one extension: best-scoring cell plus the extreme diagonals
/// (`row - col`) the pruned band ever touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpEnd {
    pub row: i32,
    pub col: i32,
    pub lo_diag: i32,
    pub hi_diag: i32,
    pub score: i32,
}

/// Two reusable DP rows.
#[derive(Debug, Default)]
pub struct DpScratch {
    v1: Vec<i32>,
    v2: Vec<i32>,
}

impl DpScratch {
    pub fn prepare(&mut self, cols: usize) -> Result<()> {
        grow_to(&mut self.v1, cols + 1)?;
        grow_to(&mut self.v2, cols + 1)?;
        Ok(())
    }
}

/// Extend forward from row `mid` with initial column band `[lo, hi]`,
/// through increasing rows and columns. Column j of the DP consumes
/// `cols[j-1]`; row i consumes `rows[i]`. Returns the best end point; its
/// `row`/`col` are exclusive end coordinates.
pub fn trace_forward(
    rows: &[u8],
    cols: &[u8],
    mid: i32,
    lo: i32,
    hi: i32,
    cost: &CostModel,
    scratch: &mut DpScratch,
) -> DpEnd {
    let row_len = rows.len() as i32;
    let col_len = cols.len() as i32;
    let diff = cost.diff_cost;
    let matchc = cost.match_cost();
    let block = cost.block_cost();

    let mut lo = lo.clamp(0, col_len);
    let mut hi = hi.clamp(0, col_len);

    let (cur, prev) = (&mut scratch.v1, &mut scratch.v2);
    let mut v: &mut Vec<i32> = cur;
    let mut w: &mut Vec<i32> = prev;

    // Basis row: zero across the seed band, then a gap-cost slope over the
    // widened columns.
    for j in lo..=hi {
        v[j as usize] = 0;
    }
    let wide = (hi + cost.max_igap).min(col_len);
    for j in hi + 1..=wide {
        v[j as usize] = v[(j - 1) as usize] - diff;
    }
    hi = wide;

    let mut mxv = 0;
    let mut mxr = mid - lo;
    let mut mxl = mid - hi;
    let mut mxi = mid;
    let mut mxj = lo;

    let mut i = mid;
    while lo <= hi && i < row_len {
        std::mem::swap(&mut v, &mut w);

        let mut prev_cell = w[lo as usize];
        let mut c = prev_cell - diff;
        v[lo as usize] = c;

        let mut j = lo + 1;
        while j <= hi {
            let t = c;
            c = prev_cell;
            prev_cell = w[j as usize];
            if bases_match(rows[i as usize], cols[(j - 1) as usize]) {
                c += matchc;
            }
            let r = c.max(prev_cell).max(t);
            c = r - diff;
            v[j as usize] = c;
            if c >= mxv {
                mxv = c;
                mxi = i + 1;
                mxj = j;
            }
            j += 1;
        }

        // Widen past the previous band while scores stay within the X-drop.
        if j <= col_len {
            let mut vv = prev_cell;
            if bases_match(rows[i as usize], cols[(j - 1) as usize]) {
                vv += matchc;
            }
            vv = vv.max(c) - diff;
            v[j as usize] = vv;
            if vv > mxv {
                mxv = vv;
                mxi = i + 1;
                mxj = j;
            }
            j += 1;
            while j <= col_len {
                vv -= diff;
                if vv < mxv - block {
                    break;
                }
                v[j as usize] = vv;
                j += 1;
            }
        }
        hi = j - 1;

        while lo <= hi && v[lo as usize] < mxv - block {
            lo += 1;
        }
        while lo <= hi && v[hi as usize] < mxv - block {
            hi -= 1;
        }

        mxr = mxr.max((i + 1) - lo);
        mxl = mxl.min((i + 1) - hi);
        i += 1;
    }

    DpEnd {
        row: mxi,
        col: mxj,
        lo_diag: mxl,
        hi_diag: mxr,
        score: mxv,
    }
}

/// Extend backward from row `top` with initial column band `[lo, hi]`,
/// through decreasing rows and columns. `xfactor` is the X-drop threshold
/// in force until the extension reaches back past row `bot`, after which
/// the standard block cost applies; the driver widens it on retries so a
/// low-quality stretch near the anchor does not truncate the reverse pass.
#[allow(clippy::too_many_arguments)]
pub fn trace_reverse(
    rows: &[u8],
    cols: &[u8],
    top: i32,
    lo: i32,
    hi: i32,
    bot: i32,
    xfactor: i32,
    cost: &CostModel,
    scratch: &mut DpScratch,
) -> DpEnd {
    let col_len = cols.len() as i32;
    let diff = cost.diff_cost;
    let matchc = cost.match_cost();
    let block = cost.block_cost();

    let mut lo = lo.clamp(0, col_len);
    let mut hi = hi.clamp(0, col_len);
    let mut xfactor = xfactor;

    let (cur, prev) = (&mut scratch.v1, &mut scratch.v2);
    let mut v: &mut Vec<i32> = cur;
    let mut w: &mut Vec<i32> = prev;

    for j in (lo..=hi).rev() {
        v[j as usize] = 0;
    }
    let wide = (lo - cost.max_igap).max(0);
    for j in (wide..lo).rev() {
        v[j as usize] = v[(j + 1) as usize] - diff;
    }
    lo = wide;

    let mut mxv = 0;
    let mut mxr = top - lo;
    let mut mxl = top - hi;
    let mut mxi = top;
    let mut mxj = lo;

    if top - 1 <= bot {
        xfactor = block;
    }

    let mut i = top - 1;
    while lo <= hi && i >= 0 {
        std::mem::swap(&mut v, &mut w);

        let mut prev_cell = w[hi as usize];
        let mut c = prev_cell - diff;
        v[hi as usize] = c;

        let mut j = hi - 1;
        while j >= lo {
            let t = c;
            c = prev_cell;
            prev_cell = w[j as usize];
            if bases_match(rows[i as usize], cols[j as usize]) {
                c += matchc;
            }
            let r = c.max(prev_cell).max(t);
            c = r - diff;
            v[j as usize] = c;
            if c >= mxv {
                mxv = c;
                mxi = i;
                mxj = j;
            }
            j -= 1;
        }

        if j >= 0 {
            let mut vv = prev_cell;
            if bases_match(rows[i as usize], cols[j as usize]) {
                vv += matchc;
            }
            vv = vv.max(c) - diff;
            v[j as usize] = vv;
            if vv > mxv {
                mxv = vv;
                mxi = i;
                mxj = j;
            }
            j -= 1;
            while j >= 0 {
                vv -= diff;
                if vv < mxv - xfactor {
                    break;
                }
                v[j as usize] = vv;
                j -= 1;
            }
        }
        lo = j + 1;

        while lo <= hi && v[lo as usize] < mxv - xfactor {
            lo += 1;
        }
        while lo <= hi && v[hi as usize] < mxv - xfactor {
            hi -= 1;
        }

        if i == bot {
            xfactor = block;
        }

        mxr = mxr.max(i - lo);
        mxl = mxl.min(i - hi);
        i -= 1;
    }

    DpEnd {
        row: mxi,
        col: mxj,
        lo_diag: mxl,
        hi_diag: mxr,
        score: mxv,
    }
}
