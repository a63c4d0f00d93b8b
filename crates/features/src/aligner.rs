//! Causal as-of alignment of the fast series to the resampled slow series.
//!
//! A backward as-of join keyed on timestamp: every fast row is paired with
//! the latest resampled slow row at or before it (equality is eligible).
//! The join is a two-pointer sweep over two ordered sequences; the slow
//! cursor only moves forward, so causality holds structurally.

use mtf_core::{DerivedSeries, Error, MergedRow, MergedTable, ResampledSlowSeries, Result};
use tracing::{info, warn};

/// Join the fast series to the resampled slow series.
///
/// Fast rows preceding the first resampled row have no causal slow match
/// and are dropped rather than filled with a sentinel. An empty result is
/// `NoUsableRows`: an empty artifact downstream would read as "no signal"
/// instead of "pipeline failure".
pub fn merge_asof(fast: DerivedSeries, resampled: ResampledSlowSeries) -> Result<MergedTable> {
    let mut rows = Vec::with_capacity(fast.len());
    let mut causality_dropped = 0usize;
    let mut cursor = 0usize;

    for bar in fast.bars {
        if resampled.is_empty() || bar.time < resampled.rows[0].grid_time {
            causality_dropped += 1;
            continue;
        }
        while cursor + 1 < resampled.rows.len() && resampled.rows[cursor + 1].grid_time <= bar.time
        {
            cursor += 1;
        }
        rows.push(MergedRow {
            time: bar.time,
            slow: resampled.rows[cursor].source.clone(),
            fast: bar,
        });
    }

    if causality_dropped > 0 {
        warn!(
            causality_dropped,
            "dropped fast rows preceding the slow series' start"
        );
    }
    if rows.is_empty() {
        return Err(Error::NoUsableRows);
    }
    info!(rows = rows.len(), "aligned fast and slow series");

    Ok(MergedTable {
        fast_timeframe: fast.timeframe,
        slow_timeframe: resampled.timeframe,
        rows,
        causality_dropped,
    })
}
