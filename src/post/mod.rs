pub mod dedup;

pub use dedup::dedup_segments;
