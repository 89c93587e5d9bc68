//! Top-level engine: owns every reusable buffer and runs the full
//! seed / corridor / extend / dedup pipeline per orientation.

use anyhow::{ensure, Context, Result};
use log::debug;

use crate::align::{align_trapezoids, AlignScratch};
use crate::common::LocalSegment;
use crate::config::{CostModel, CostPolicy, EngineConfig, SearchMode};
use crate::post::dedup_segments;
use crate::seed::{find_hits, DiagScratch, HitRecord, KmerIndex};
use crate::sequence::reverse_complement_into;
use crate::trap::{build_trapezoids, split_trapezoids, Trapezoid};

/// Reusable aligner state. Create one per thread and feed it sequence
/// pairs; every internal buffer is retained between calls, so steady-state
/// searches allocate only when a pair outgrows everything seen before.
#[derive(Debug)]
pub struct AlignerContext {
    config: EngineConfig,
    index: KmerIndex,
    diag: DiagScratch,
    hits: Vec<HitRecord>,
    traps: Vec<Trapezoid>,
    trap_open: Vec<Trapezoid>,
    trap_split: Vec<Trapezoid>,
    align: AlignScratch,
    b_rc: Vec<u8>,
    pass_segs: Vec<LocalSegment>,
    segs: Vec<LocalSegment>,
}

impl AlignerContext {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            index: KmerIndex::default(),
            diag: DiagScratch::default(),
            hits: Vec::new(),
            traps: Vec::new(),
            trap_open: Vec::new(),
            trap_split: Vec::new(),
            align: AlignScratch::default(),
            b_rc: Vec::new(),
            pass_segs: Vec::new(),
            segs: Vec::new(),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Find every local alignment segment between `a` and `b` of length at
    /// least `min_len` on both axes and error rate at most `max_diff`.
    ///
    /// `mode` selects which orientations of B to search; segments found
    /// against the reverse complement are reported in original-B
    /// coordinates with `b_begin > b_end`. The returned slice is borrowed
    /// from the context and valid until the next call.
    pub fn find_local_segments(
        &mut self,
        a: &[u8],
        b: &[u8],
        mode: SearchMode,
        min_len: i32,
        max_diff: f64,
    ) -> Result<&[LocalSegment]> {
        ensure!(min_len > 0, "min_len must be positive, got {}", min_len);
        ensure!(
            (0.0..=1.0).contains(&max_diff),
            "max_diff must be in [0,1], got {}",
            max_diff
        );
        ensure!(
            a.len() <= i32::MAX as usize && b.len() <= i32::MAX as usize,
            "sequences longer than i32::MAX are not supported"
        );

        let cost = match self.config.cost_policy {
            CostPolicy::Fixed => self.config.cost,
            CostPolicy::ScaleToErrorRate => CostModel::from_error_rate(max_diff),
        };

        self.index.build(a, &self.config.seed)?;
        self.segs.clear();

        if mode.forward() {
            self.run_pass(a, b, false, min_len, max_diff, &cost)?;
        }
        if mode.reverse() {
            let mut b_rc = std::mem::take(&mut self.b_rc);
            reverse_complement_into(b, &mut b_rc);
            let result = self.run_pass(a, &b_rc, true, min_len, max_diff, &cost);
            self.b_rc = b_rc;
            result?;
        }

        Ok(&self.segs)
    }

    /// One orientation: seed against the prebuilt A index, merge hit
    /// chains into corridors, align, and deduplicate this pass's output.
    fn run_pass(
        &mut self,
        a: &[u8],
        b: &[u8],
        comp: bool,
        min_len: i32,
        max_diff: f64,
        cost: &CostModel,
    ) -> Result<()> {
        let spec = &self.config.seed;

        find_hits(
            a.len() as i32,
            b,
            &self.index,
            spec,
            &mut self.diag,
            &mut self.hits,
        )?;
        build_trapezoids(
            &self.hits,
            spec.bpadding(),
            &mut self.trap_open,
            &mut self.traps,
        );
        split_trapezoids(a, b, &mut self.traps, spec, cost, &mut self.trap_split);

        self.pass_segs.clear();
        align_trapezoids(
            a,
            b,
            &mut self.traps,
            comp,
            min_len,
            max_diff,
            spec,
            cost,
            &mut self.align,
            &mut self.pass_segs,
        )?;
        dedup_segments(&mut self.pass_segs, max_diff);

        debug!(
            "{} pass: {} hit chains, {} corridors, {} segments",
            if comp { "reverse" } else { "forward" },
            self.hits.len(),
            self.traps.len(),
            self.pass_segs.len()
        );

        self.segs
            .try_reserve(self.pass_segs.len())
            .context("out of memory collecting segments")?;
        self.segs.append(&mut self.pass_segs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_forward_match() {
        let mut ctx = AlignerContext::with_defaults().unwrap();
        let seq = b"ACGGTCAGTCAAGCTTACGGATCCTGAAGTCA";
        let segs = ctx
            .find_local_segments(seq, seq, SearchMode::Forward, 20, 0.05)
            .unwrap();
        assert_eq!(segs.len(), 1);
        let s = &segs[0];
        assert_eq!((s.a_begin, s.a_end), (0, 32));
        assert_eq!((s.b_begin, s.b_end), (0, 32));
        assert_eq!(s.error_rate, 0.0);
    }

    #[test]
    fn test_reverse_match_reported_on_original_strand() {
        let mut ctx = AlignerContext::with_defaults().unwrap();
        let a = b"ACGGTCAGTCAAGCTTACGGATCCTGAAGTCA";
        let mut b = Vec::new();
        crate::sequence::reverse_complement_into(a, &mut b);
        let segs = ctx
            .find_local_segments(a, &b, SearchMode::Reverse, 20, 0.05)
            .unwrap();
        assert_eq!(segs.len(), 1);
        let s = &segs[0];
        assert!(s.is_reverse());
        assert_eq!((s.a_begin, s.a_end), (0, 32));
        assert_eq!((s.b_begin, s.b_end), (32, 0));
    }

    #[test]
    fn test_forward_mode_ignores_reverse_hit() {
        let mut ctx = AlignerContext::with_defaults().unwrap();
        let a = b"ACGGTCAGTCAAGCTTACGGATCCTGAAGTCA";
        let mut b = Vec::new();
        crate::sequence::reverse_complement_into(a, &mut b);
        let segs = ctx
            .find_local_segments(a, &b, SearchMode::Forward, 20, 0.05)
            .unwrap();
        assert!(segs.is_empty());
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut ctx = AlignerContext::with_defaults().unwrap();
        let segs = ctx
            .find_local_segments(b"", b"ACGT", SearchMode::Both, 20, 0.05)
            .unwrap();
        assert!(segs.is_empty());
        let segs = ctx
            .find_local_segments(b"ACGT", b"", SearchMode::Both, 20, 0.05)
            .unwrap();
        assert!(segs.is_empty());
    }

    #[test]
    fn test_parameter_validation() {
        let mut ctx = AlignerContext::with_defaults().unwrap();
        assert!(ctx
            .find_local_segments(b"ACGT", b"ACGT", SearchMode::Both, 0, 0.05)
            .is_err());
        assert!(ctx
            .find_local_segments(b"ACGT", b"ACGT", SearchMode::Both, 20, 1.5)
            .is_err());
        assert!(AlignerContext::new(EngineConfig {
            seed: crate::SeedSpec {
                kmer_len: 4,
                min_match: 10,
                max_error: 2,
            },
            ..Default::default()
        })
        .is_err());
    }
}
