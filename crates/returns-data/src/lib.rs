//! Data ingestion layer for browser-returns.
//!
//! Responsible for discovering and reading CSV exports, normalizing rows into
//! visit records, grouping them by client and deriving per-client metrics.

pub mod grouper;
pub mod metrics;
pub mod normalizer;
pub mod reader;

pub use returns_core as core;
