//! Per-timeframe log-return derivation.
//!
//! Converts a raw `TimeSeries` into a `DerivedSeries` carrying
//! ln(close_t / close_{t-1}) per bar. The first bar has no prior close and is
//! dropped; degenerate ratios (zero-price artifacts) are clamped to 0 and the
//! bar is retained, so row count stays at source length minus one.

use mtf_core::{DerivedBar, DerivedSeries, TimeSeries};
use tracing::warn;

/// Derive per-bar log returns, consuming the raw series.
pub fn derive_returns(series: TimeSeries) -> DerivedSeries {
    let TimeSeries {
        timeframe, bars, ..
    } = series;

    let mut derived = Vec::with_capacity(bars.len().saturating_sub(1));
    let mut degenerate_returns = 0usize;

    for pair in bars.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);
        let raw = (bar.close / prev.close).ln();
        let log_return = if raw.is_finite() {
            raw
        } else {
            // Zero-price input bars are data artifacts, not meaningful
            // returns; clamp instead of propagating +/-inf or NaN.
            degenerate_returns += 1;
            0.0
        };
        derived.push(DerivedBar::from_bar(bar.clone(), log_return));
    }

    if degenerate_returns > 0 {
        warn!(
            timeframe = timeframe.label(),
            degenerate_returns, "clamped degenerate log returns to 0"
        );
    }

    DerivedSeries {
        timeframe,
        bars: derived,
        degenerate_returns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use mtf_core::{Bar, Timeframe};

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 4)
            .unwrap()
            .and_hms_opt(8, minute, 0)
            .unwrap()
    }

    fn series_with_closes(closes: &[f64]) -> TimeSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                time: ts(i as u32 * 15),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100.0,
            })
            .collect();
        TimeSeries::new(Timeframe::m15(), bars)
    }

    #[test]
    fn test_log_return_values() {
        let derived = derive_returns(series_with_closes(&[100.0, 105.0, 105.0]));

        assert_eq!(derived.len(), 2);
        assert_abs_diff_eq!(
            derived.bars[0].log_return,
            (105.0f64 / 100.0).ln(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(derived.bars[0].log_return, 0.04879, epsilon = 1e-5);
        assert_abs_diff_eq!(derived.bars[1].log_return, 0.0, epsilon = 1e-12);
        assert_eq!(derived.degenerate_returns, 0);
    }

    #[test]
    fn test_first_bar_dropped() {
        let derived = derive_returns(series_with_closes(&[100.0, 101.0, 102.0]));
        assert_eq!(derived.len(), 2);
        assert_eq!(derived.bars[0].time, ts(15));
    }

    #[test]
    fn test_zero_close_clamped_not_dropped() {
        let derived = derive_returns(series_with_closes(&[0.0, 100.0, 101.0]));

        // ln(100/0) = +inf, clamped; the bar itself stays.
        assert_eq!(derived.len(), 2);
        assert_abs_diff_eq!(derived.bars[0].log_return, 0.0, epsilon = 1e-12);
        assert!(derived.bars[0].log_return.is_finite());
        assert_eq!(derived.degenerate_returns, 1);
    }

    #[test]
    fn test_zero_over_zero_clamped() {
        let derived = derive_returns(series_with_closes(&[0.0, 0.0, 100.0]));

        // 0/0 = NaN and 100/0 = +inf, both clamped to 0.
        assert_eq!(derived.len(), 2);
        assert!(derived.bars.iter().all(|b| b.log_return == 0.0));
        assert_eq!(derived.degenerate_returns, 2);
    }

    #[test]
    fn test_short_series_yields_empty() {
        assert!(derive_returns(series_with_closes(&[100.0])).is_empty());
        assert!(derive_returns(series_with_closes(&[])).is_empty());
    }
}
