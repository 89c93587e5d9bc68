use trapseg::{AlignerContext, CostPolicy, EngineConfig, SearchMode, SeedSpec};

use crate::helpers::{init_logs, random_dna, revcomp, substitute};

#[test]
fn test_single_substitution_is_bridged() {
    init_logs();
    let a = random_dna(100, 11);
    let mut b = a.clone();
    substitute(&mut b, 50);

    let mut ctx = AlignerContext::with_defaults().unwrap();
    let segs = ctx
        .find_local_segments(&a, &b, SearchMode::Forward, 80, 0.05)
        .unwrap();

    assert_eq!(segs.len(), 1);
    let s = &segs[0];
    assert_eq!((s.a_begin, s.a_end), (0, 100));
    assert_eq!((s.b_begin, s.b_end), (0, 100));
    assert!(s.error_rate > 0.0 && s.error_rate < 0.02);
    assert!(s.score >= 90);
}

#[test]
fn test_ambiguous_run_splits_segments() {
    let left = random_dna(40, 7);
    let right = random_dna(40, 8);
    let mut seq = left;
    seq.extend(std::iter::repeat(b'N').take(6));
    seq.extend(right);

    let mut ctx = AlignerContext::with_defaults().unwrap();
    let segs = ctx
        .find_local_segments(&seq, &seq.clone(), SearchMode::Forward, 20, 0.05)
        .unwrap();

    assert_eq!(segs.len(), 2);
    assert_eq!((segs[0].a_begin, segs[0].a_end), (0, 40));
    assert_eq!((segs[0].b_begin, segs[0].b_end), (0, 40));
    assert_eq!((segs[1].a_begin, segs[1].a_end), (46, 86));
    assert_eq!((segs[1].b_begin, segs[1].b_end), (46, 86));
    assert_eq!(segs[0].error_rate, 0.0);
    assert_eq!(segs[1].error_rate, 0.0);
}

#[test]
fn test_sparse_shared_mers_stay_below_threshold() {
    // One shared 5-mer is far below the chain threshold.
    let a = b"AAAAAAAAGCGTGAAAAAAA";
    let b = b"TTTTTTTTGCGTGTTTTTTT";

    let mut ctx = AlignerContext::with_defaults().unwrap();
    let segs = ctx
        .find_local_segments(a, b, SearchMode::Forward, 20, 0.05)
        .unwrap();
    assert!(segs.is_empty());
}

#[test]
fn test_reverse_segment_matches_mirrored_forward_search() {
    init_logs();
    let a = random_dna(120, 21);
    let mut b = random_dna(120, 22);
    let insert = revcomp(&a[20..80]);
    b[30..90].copy_from_slice(&insert);
    let b_len = b.len() as i32;

    let mut ctx = AlignerContext::with_defaults().unwrap();
    let both: Vec<_> = ctx
        .find_local_segments(&a, &b, SearchMode::Both, 40, 0.02)
        .unwrap()
        .to_vec();
    assert_eq!(both.len(), 1);
    let s = both[0];
    assert!(s.is_reverse());
    assert!(s.a_begin <= 20 && s.a_end >= 80);
    assert!(s.b_begin >= 90 && s.b_end <= 30);

    // Searching forward against the reverse complement of B must find the
    // same segment in mirrored B coordinates.
    let b_rc = revcomp(&b);
    let fwd: Vec<_> = ctx
        .find_local_segments(&a, &b_rc, SearchMode::Forward, 40, 0.02)
        .unwrap()
        .to_vec();
    assert_eq!(fwd.len(), 1);
    let f = fwd[0];
    assert_eq!((s.a_begin, s.a_end), (f.a_begin, f.a_end));
    assert_eq!(s.b_begin, b_len - f.b_begin);
    assert_eq!(s.b_end, b_len - f.b_end);
    assert_eq!(s.low_diag, f.low_diag + b_len);
    assert_eq!(s.high_diag, f.high_diag + b_len);
    assert_eq!(s.score, f.score);
}

#[test]
fn test_scaled_cost_policy_finds_exact_match() {
    let config = EngineConfig {
        cost_policy: CostPolicy::ScaleToErrorRate,
        ..Default::default()
    };
    let mut ctx = AlignerContext::new(config).unwrap();
    let seq = random_dna(64, 33);
    let segs = ctx
        .find_local_segments(&seq, &seq.clone(), SearchMode::Forward, 40, 0.05)
        .unwrap();
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].error_rate, 0.0);
    assert_eq!((segs[0].a_begin, segs[0].a_end), (0, 64));
}

#[test]
fn test_moderate_profile_finds_long_match() {
    let config = EngineConfig {
        seed: SeedSpec::moderate(),
        ..Default::default()
    };
    let mut ctx = AlignerContext::new(config).unwrap();
    let seq = random_dna(200, 44);
    let segs = ctx
        .find_local_segments(&seq, &seq.clone(), SearchMode::Forward, 100, 0.02)
        .unwrap();
    assert_eq!(segs.len(), 1);
    assert_eq!((segs[0].a_begin, segs[0].a_end), (0, 200));
}

#[test]
fn test_context_reuse_across_size_changes() {
    let mut ctx = AlignerContext::with_defaults().unwrap();
    let big = random_dna(500, 55);
    let segs = ctx
        .find_local_segments(&big, &big.clone(), SearchMode::Forward, 100, 0.02)
        .unwrap();
    assert_eq!(segs.len(), 1);

    let small = random_dna(40, 56);
    let segs = ctx
        .find_local_segments(&small, &small.clone(), SearchMode::Forward, 30, 0.02)
        .unwrap();
    assert_eq!(segs.len(), 1);
    assert_eq!((segs[0].a_begin, segs[0].a_end), (0, 40));
}
