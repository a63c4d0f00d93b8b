//! Core types and configuration for the mtf-merge pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Bar-series types (bars, timeframes, derived and merged rows)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{MergeConfig, SourceConfig};
pub use error::{Error, Result};
pub use types::*;
