//! Slow-series resampling onto the fast time grid.
//!
//! Projects the slow `DerivedSeries` onto a fine grid by forward-fill: each
//! grid timestamp carries the most recent slow bar at or before it. Values
//! are never averaged or interpolated. The grid starts at the first slow
//! bar, so a grid row can never reference a slow bar from its future.

use chrono::Duration;
use mtf_core::{DerivedSeries, ResampledBar, ResampledSlowSeries};

/// Re-express the slow series at `grid_period` spacing via forward-fill.
///
/// The grid spans the slow series' own first and last timestamps. Grid
/// points earlier than the first slow bar have no defined value and are
/// structurally absent from the output.
pub fn resample_to_grid(slow: &DerivedSeries, grid_period: Duration) -> ResampledSlowSeries {
    let mut rows = Vec::new();

    // A non-positive period cannot define a grid; the sweep below would
    // never advance.
    if grid_period <= Duration::zero() {
        return ResampledSlowSeries {
            timeframe: slow.timeframe.clone(),
            rows,
        };
    }

    if let (Some(first), Some(last)) = (
        slow.bars.first().map(|b| b.time),
        slow.bars.last().map(|b| b.time),
    ) {
        let mut grid_time = first;
        let mut cursor = 0usize;

        while grid_time <= last {
            // Advance to the latest slow bar with time <= grid_time.
            while cursor + 1 < slow.bars.len() && slow.bars[cursor + 1].time <= grid_time {
                cursor += 1;
            }
            rows.push(ResampledBar {
                grid_time,
                source: slow.bars[cursor].clone(),
            });
            grid_time = grid_time + grid_period;
        }
    }

    ResampledSlowSeries {
        timeframe: slow.timeframe.clone(),
        rows,
    }
}
