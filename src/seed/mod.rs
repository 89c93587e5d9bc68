//! Seeding: k-mer index over A and diagonal hit chaining against B.

pub mod hits;
pub mod index;

pub use hits::{find_hits, DiagScratch, HitRecord};
pub use index::KmerIndex;
