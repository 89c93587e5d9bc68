//! Duplicate removal over raw segment output.
//!
//! The recursive corridor alignment can rediscover the same segment from
//! several corridors, and a segment may share a begin or end point with a
//! shorter echo of itself. Two sweeps mark losers with a negative score,
//! then one compaction drops them.

use crate::common::{by_begin, by_end, LocalSegment};

/// Remove duplicate segments in place.
///
/// First sweep: among segments sharing both begin coordinates and an
/// orientation, keep the one with the greater combined extent, provided it
/// stays within the error budget (score breaks ties). Second sweep: among
/// segments sharing both end coordinates and an orientation, keep the
/// higher score (extent breaks ties). Output keeps all segments with
/// `score >= 0`, ordered by begin coordinates.
pub fn dedup_segments(segs: &mut Vec<LocalSegment>, max_diff: f64) {
    sweep(segs, by_begin, |s| (s.a_begin, s.b_begin), |s, t| {
        (s.error_rate <= max_diff, s.combined_len(), s.score)
            < (t.error_rate <= max_diff, t.combined_len(), t.score)
    });
    sweep(segs, by_end, |s| (s.a_end, s.b_end), |s, t| {
        (s.score, s.combined_len()) < (t.score, t.combined_len())
    });
    segs.retain(|s| s.score >= 0);
    segs.sort_by(by_begin);
}

/// Sort by `order`, then within runs sharing `anchor` and orientation,
/// mark every segment `worse` than the run's best with a negative score.
fn sweep(
    segs: &mut [LocalSegment],
    order: fn(&LocalSegment, &LocalSegment) -> std::cmp::Ordering,
    anchor: fn(&LocalSegment) -> (i32, i32),
    worse: impl Fn(&LocalSegment, &LocalSegment) -> bool,
) {
    segs.sort_by(order);
    let mut i = 0;
    while i < segs.len() {
        let mut best = i;
        let mut j = i + 1;
        while j < segs.len()
            && anchor(&segs[j]) == anchor(&segs[i])
            && segs[j].is_reverse() == segs[i].is_reverse()
        {
            if segs[j].score >= 0 {
                if segs[best].score < 0 || worse(&segs[best], &segs[j]) {
                    best = j;
                }
            }
            j += 1;
        }
        for m in i..j {
            if m != best && segs[m].score >= 0 {
                segs[m].score = -1;
            }
        }
        i = j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ab: i32, ae: i32, bb: i32, be: i32, score: i32) -> LocalSegment {
        LocalSegment {
            a_begin: ab,
            a_end: ae,
            b_begin: bb,
            b_end: be,
            low_diag: bb - ab,
            high_diag: bb - ab,
            score,
            error_rate: 0.0,
        }
    }

    #[test]
    fn test_shared_begin_keeps_longer() {
        let mut v = vec![seg(0, 20, 0, 20, 18), seg(0, 35, 0, 35, 30)];
        dedup_segments(&mut v, 0.5);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].a_end, 35);
    }

    #[test]
    fn test_shared_end_keeps_higher_score() {
        let mut v = vec![seg(0, 40, 0, 40, 36), seg(5, 40, 5, 40, 35)];
        dedup_segments(&mut v, 0.5);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].score, 36);
    }

    #[test]
    fn test_orientation_never_mixed() {
        // Same begin coordinates, opposite strands: both survive.
        let mut v = vec![seg(0, 20, 10, 30, 20), seg(0, 20, 10, 0, 9)];
        dedup_segments(&mut v, 0.5);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let mut v = vec![
            seg(0, 20, 0, 20, 18),
            seg(0, 35, 0, 35, 30),
            seg(50, 90, 50, 90, 40),
            seg(55, 90, 55, 90, 33),
        ];
        dedup_segments(&mut v, 0.5);
        let once = v.clone();
        dedup_segments(&mut v, 0.5);
        assert_eq!(v, once);
    }
}
