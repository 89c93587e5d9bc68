//! Engine parameters: seeding sensitivity, extension scoring, orientation.

use anyhow::{ensure, Result};

/// Padding, in diagonals, within which a hit merges into an open trapezoid.
pub const DPADDING: i32 = 2;

/// Seeding sensitivity parameters for the k-mer index and hit finder.
///
/// A chain of shared k-mers on (nearly) one diagonal only becomes a hit once
/// it accumulates `kthresh()` mers without a gap longer than
/// `min_match - kmer_len` windows.
#[derive(Debug, Clone, Copy)]
pub struct SeedSpec {
    /// K-mer length; must be in 1..=15.
    pub kmer_len: usize,
    /// Minimum length of an exact-matching stretch the filter is tuned for.
    pub min_match: i32,
    /// Number of adjacent diagonals a chain tolerates (small indels).
    pub max_error: i32,
}

impl Default for SeedSpec {
    /// Tuned for fragment-against-fragment comparisons; finds relatively
    /// small segments.
    fn default() -> Self {
        Self {
            kmer_len: 5,
            min_match: 20,
            max_error: 2,
        }
    }
}

impl SeedSpec {
    /// Tuned for moderate-sized alignments (faster on large inputs, less
    /// sensitive to short segments).
    pub fn moderate() -> Self {
        Self {
            kmer_len: 8,
            min_match: 36,
            max_error: 2,
        }
    }

    /// Tuned for long, near-identity matches (BAC-scale comparisons).
    pub fn long_identity() -> Self {
        Self {
            kmer_len: 12,
            min_match: 100,
            max_error: 2,
        }
    }

    /// Minimum mer count for a diagonal chain to be reported as a hit.
    #[inline]
    pub fn kthresh(&self) -> i32 {
        let k = self.kmer_len as i32;
        self.min_match - (k - 1) - k * self.max_error
    }

    /// Window gap beyond which a diagonal chain disconnects.
    #[inline]
    pub fn disconnect(&self) -> i32 {
        self.min_match - self.kmer_len as i32
    }

    /// Padding, in B positions, below which an open trapezoid stays open.
    #[inline]
    pub fn bpadding(&self) -> i32 {
        self.kmer_len as i32 + 2
    }

    /// Number of 2K-bit mer buckets (4^K).
    #[inline]
    pub fn bucket_count(&self) -> usize {
        1usize << (2 * self.kmer_len)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=15).contains(&self.kmer_len),
            "kmer_len must be in 1..=15, got {}",
            self.kmer_len
        );
        ensure!(
            self.max_error >= 0,
            "max_error must be non-negative, got {}",
            self.max_error
        );
        ensure!(
            self.kthresh() >= 1,
            "seed spec is self-defeating: kthresh = {} (min_match {} too small \
             for kmer_len {} and max_error {})",
            self.kthresh(),
            self.min_match,
            self.kmer_len,
            self.max_error
        );
        Ok(())
    }
}

/// Scoring constants for the greedy X-drop extension.
///
/// A matched column nets `+same_cost`, a mismatched or gapped column nets
/// `-diff_cost`; the band is pruned `block_cost()` below the running best
/// score, which bounds bridgeable indels to `max_igap` columns.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    pub same_cost: i32,
    pub diff_cost: i32,
    /// Maximum run of bases an extension may bridge or widen past the band.
    pub max_igap: i32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            same_cost: 1,
            diff_cost: 3,
            max_igap: 3,
        }
    }
}

impl CostModel {
    /// Scale match/mismatch costs so that extensions terminate near the
    /// given target error rate.
    pub fn from_error_rate(max_diff: f64) -> Self {
        let same = (100.0 * max_diff).ceil() as i32;
        Self {
            same_cost: same,
            diff_cost: 100 - same,
            max_igap: 3,
        }
    }

    /// Amount added to a cell's score before the uniform `diff_cost`
    /// subtraction when its column is an exact base match.
    #[inline]
    pub fn match_cost(&self) -> i32 {
        self.same_cost + self.diff_cost
    }

    /// X-drop pruning threshold.
    #[inline]
    pub fn block_cost(&self) -> i32 {
        self.diff_cost * self.max_igap
    }
}

/// How the per-call cost model is chosen.
#[derive(Debug, Clone, Copy, Default)]
pub enum CostPolicy {
    /// Use one fixed model for every call.
    #[default]
    Fixed,
    /// Derive the model from each call's `max_diff` (variable stringency).
    ScaleToErrorRate,
}

/// Which orientations of B to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    Forward,
    Reverse,
    #[default]
    Both,
}

impl SearchMode {
    #[inline]
    pub fn forward(self) -> bool {
        self != SearchMode::Reverse
    }

    #[inline]
    pub fn reverse(self) -> bool {
        self != SearchMode::Forward
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" | "forw" => Ok(SearchMode::Forward),
            "reverse" | "revr" => Ok(SearchMode::Reverse),
            "both" => Ok(SearchMode::Both),
            _ => Err(format!(
                "Unknown search mode: {}. Use 'forward', 'reverse' or 'both'",
                s
            )),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub seed: SeedSpec,
    pub cost: CostModel,
    pub cost_policy: CostPolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.seed.validate()?;
        ensure!(
            self.cost.diff_cost > 0 && self.cost.max_igap > 0,
            "cost model must have positive diff_cost and max_igap"
        );
        Ok(())
    }
}
