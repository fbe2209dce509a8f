//! Runtime layer for browser-returns.
//!
//! Runs the aggregation pipeline and the concurrent per-bucket rollups.

pub mod pipeline;
pub mod rollup;

pub use returns_core as core;
pub use returns_data as data;
