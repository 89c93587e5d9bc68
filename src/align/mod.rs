//! Banded greedy extension and the divide-and-conquer trapezoid driver.

pub mod driver;
pub mod extend;

pub use driver::{align_trapezoids, AlignScratch};
pub use extend::{trace_forward, trace_reverse, DpEnd, DpScratch};
