//! Shared types for browser-returns.
//!
//! Domain models, the error type, bucket configuration and classification,
//! CLI settings and report rendering.

pub mod buckets;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, ReturnsError};
