//! Multi-timeframe alignment and feature derivation.
//!
//! This crate handles:
//! - Forward-fill resampling of the slow series onto the fast grid
//! - The backward as-of join producing the merged table
//! - The feature contract and its row-to-vector projection

pub mod aligner;
pub mod contract;
pub mod resampler;

pub use aligner::merge_asof;
pub use contract::{FeatureContract, FeatureVector, Predictor};
pub use resampler::resample_to_grid;
