//! Seed-and-extend discovery of maximal local alignment segments between
//! two nucleotide sequences.
//!
//! ```no_run
//! use trapseg::{AlignerContext, SearchMode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut ctx = AlignerContext::with_defaults()?;
//! let segs = ctx.find_local_segments(b"ACGT", b"ACGT", SearchMode::Both, 20, 0.05)?;
//! for s in segs {
//!     println!("{}..{} x {}..{} ({:.3})", s.a_begin, s.a_end, s.b_begin, s.b_end, s.error_rate);
//! }
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod common;
pub mod config;
pub mod engine;
pub mod post;
pub mod seed;
pub mod sequence;
pub mod trap;

pub use common::LocalSegment;
pub use config::{CostModel, CostPolicy, EngineConfig, SearchMode, SeedSpec};
pub use engine::AlignerContext;
