//! End-to-end composition of the mtf-merge pipeline.
//!
//! One run reads both raw series, derives per-timeframe log returns,
//! forward-fills the slow series onto the fast grid, performs the causal
//! as-of join, gates the result through the feature contract, and exports
//! the merged artifact. Runs are batch, single-threaded, and stateless;
//! structural errors abort before any output is written.

use mtf_core::{MergeConfig, MergedTable, Result};
use mtf_export::{export_csv, write_signal};
use mtf_features::{merge_asof, resample_to_grid, FeatureContract, Predictor};
use mtf_ingestion::{derive_returns, load_series};
use tracing::info;

/// Summary of one completed merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Rows in the exported artifact.
    pub rows_written: usize,
    /// Duplicate-timestamp rows dropped from the fast source.
    pub duplicate_fast: usize,
    /// Duplicate-timestamp rows dropped from the slow source.
    pub duplicate_slow: usize,
    /// Degenerate log returns clamped in the fast series.
    pub degenerate_fast: usize,
    /// Degenerate log returns clamped in the slow series.
    pub degenerate_slow: usize,
    /// Fast rows dropped for preceding the slow series' start.
    pub causality_dropped: usize,
}

/// Aligned table plus the data-quality tallies gathered along the way.
struct Aligned {
    table: MergedTable,
    duplicate_fast: usize,
    duplicate_slow: usize,
    degenerate_fast: usize,
    degenerate_slow: usize,
}

fn align(config: &MergeConfig) -> Result<Aligned> {
    let fast_raw = load_series(&config.fast.path, config.fast.timeframe())?;
    let slow_raw = load_series(&config.slow.path, config.slow.timeframe())?;
    let duplicate_fast = fast_raw.duplicates_dropped;
    let duplicate_slow = slow_raw.duplicates_dropped;

    let fast = derive_returns(fast_raw);
    let slow = derive_returns(slow_raw);
    let degenerate_fast = fast.degenerate_returns;
    let degenerate_slow = slow.degenerate_returns;

    let resampled = resample_to_grid(&slow, config.fast.timeframe().period());
    let table = merge_asof(fast, resampled)?;

    Ok(Aligned {
        table,
        duplicate_fast,
        duplicate_slow,
        degenerate_fast,
        degenerate_slow,
    })
}

/// Build the aligned table in memory without exporting it.
///
/// The live-inference path uses this to derive the newest feature vector
/// from the same code path the training artifact came from.
pub fn build_table(config: &MergeConfig) -> Result<MergedTable> {
    Ok(align(config)?.table)
}

/// Run the full merge and export the artifact.
pub fn run(config: &MergeConfig) -> Result<RunReport> {
    let aligned = align(config)?;
    let table = &aligned.table;

    // Contract gate: refuse to export a table the model paths cannot use.
    let contract = FeatureContract::for_timeframes(&table.fast_timeframe, &table.slow_timeframe);
    contract.project_table(&table.rows)?;

    let rows_written = export_csv(&config.output_path, table)?;
    info!(rows_written, "merge run complete");

    Ok(RunReport {
        rows_written,
        duplicate_fast: aligned.duplicate_fast,
        duplicate_slow: aligned.duplicate_slow,
        degenerate_fast: aligned.degenerate_fast,
        degenerate_slow: aligned.degenerate_slow,
        causality_dropped: table.causality_dropped,
    })
}

/// Score the newest usable row and write the signal artifact.
///
/// Vectors are handed to the predictor unscaled; applying a persisted
/// training-time scaler is the predictor implementation's responsibility.
pub fn emit_signal(config: &MergeConfig, predictor: &dyn Predictor) -> Result<f64> {
    let table = build_table(config)?;
    let contract = FeatureContract::for_timeframes(&table.fast_timeframe, &table.slow_timeframe);
    let latest = contract.latest_vector(&table.rows)?;

    let probability = predictor.predict(&latest)?;
    write_signal(&config.signal_path, probability)?;
    Ok(probability)
}
