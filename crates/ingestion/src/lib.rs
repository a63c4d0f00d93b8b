//! Data ingestion and normalization for the mtf-merge pipeline.
//!
//! This crate handles:
//! - Raw bar CSV loading and schema validation
//! - Timestamp assembly and ascending sort with duplicate removal
//! - Per-timeframe log-return derivation

pub mod loader;
pub mod normalizer;

pub use loader::{load_series, DATE_TIME_FORMAT};
pub use normalizer::derive_returns;
