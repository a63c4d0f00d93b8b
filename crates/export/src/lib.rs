//! Durable artifact writing for the mtf-merge pipeline.
//!
//! This crate handles:
//! - Merged-table CSV export (write-temp-then-rename, never partial)
//! - The single-line signal artifact consumed by the trading terminal

pub mod exporter;
pub mod signal;

pub use exporter::{export_csv, EXPORT_TIME_FORMAT};
pub use signal::write_signal;
