//! Core data types for the mtf-merge pipeline.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A sampling period with a column-qualification label (e.g. "15m", "4h").
///
/// The label is appended to field names when two timeframes coexist in one
/// row (Open15m, Close4h), so it must be unique per series in a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    label: String,
    minutes: i64,
}

impl Timeframe {
    /// Create a timeframe from a label and a period in minutes.
    pub fn new(label: impl Into<String>, minutes: i64) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }

    /// The 15-minute timeframe.
    pub fn m15() -> Self {
        Self::new("15m", 15)
    }

    /// The 4-hour timeframe.
    pub fn h4() -> Self {
        Self::new("4h", 240)
    }

    /// Column-qualification label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sampling period as a duration.
    pub fn period(&self) -> Duration {
        Duration::minutes(self.minutes)
    }

    /// Build a timeframe-qualified column name (e.g. "Close" -> "Close15m").
    pub fn qualify(&self, field: &str) -> String {
        format!("{}{}", field, self.label)
    }
}

/// One OHLCV observation for a fixed time interval.
///
/// Timestamps are timezone-naive local trading time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open timestamp.
    pub time: NaiveDateTime,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Tick volume.
    pub volume: f64,
}

/// An ordered bar sequence for one timeframe.
///
/// Invariant after loading: timestamps are unique and strictly ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Sampling period tag.
    pub timeframe: Timeframe,
    /// Bars sorted ascending by timestamp.
    pub bars: Vec<Bar>,
    /// Duplicate-timestamp rows discarded during loading (first kept).
    pub duplicates_dropped: usize,
}

impl TimeSeries {
    /// Create a series from pre-sorted bars.
    pub fn new(timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        Self {
            timeframe,
            bars,
            duplicates_dropped: 0,
        }
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Timestamp of the first bar, if any.
    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.bars.first().map(|b| b.time)
    }

    /// Timestamp of the last bar, if any.
    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|b| b.time)
    }
}

/// A bar augmented with its one-step log return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedBar {
    /// Bar open timestamp.
    pub time: NaiveDateTime,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Tick volume.
    pub volume: f64,
    /// ln(close_t / close_{t-1}); degenerate ratios are clamped to 0.
    pub log_return: f64,
}

impl DerivedBar {
    /// Attach a log return to a bar.
    pub fn from_bar(bar: Bar, log_return: f64) -> Self {
        Self {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            log_return,
        }
    }
}

/// A TimeSeries with per-bar log returns; the first source bar is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedSeries {
    /// Sampling period tag.
    pub timeframe: Timeframe,
    /// Derived bars sorted ascending by timestamp.
    pub bars: Vec<DerivedBar>,
    /// Log returns clamped to 0 because of a zero-denominator artifact.
    pub degenerate_returns: usize,
}

impl DerivedSeries {
    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// One slow-series observation projected onto a fast-grid timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledBar {
    /// Fast-grid timestamp this row is aligned to.
    pub grid_time: NaiveDateTime,
    /// Most recent slow bar with `source.time <= grid_time`.
    pub source: DerivedBar,
}

/// The slow series re-expressed at the fast sampling period by forward-fill.
///
/// Invariant: `rows[i].source.time <= rows[i].grid_time` for every row, and
/// grid timestamps are strictly ascending at the grid period's spacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampledSlowSeries {
    /// Timeframe of the source slow series.
    pub timeframe: Timeframe,
    /// Forward-filled rows on the fast grid.
    pub rows: Vec<ResampledBar>,
}

impl ResampledSlowSeries {
    /// Number of grid rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One fast-grid timestamp with fast fields and as-of-matched slow fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    /// Fast-grid timestamp.
    pub time: NaiveDateTime,
    /// Fast-timeframe bar at this timestamp.
    pub fast: DerivedBar,
    /// Slow-timeframe bar observed at or before this timestamp.
    pub slow: DerivedBar,
}

impl MergedRow {
    /// Whether the slow component respects causality (no lookahead).
    pub fn is_causal(&self) -> bool {
        self.slow.time <= self.time
    }
}

/// The aligned multi-timeframe table produced by the causal aligner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedTable {
    /// Fast-timeframe tag (drives the output grid).
    pub fast_timeframe: Timeframe,
    /// Slow-timeframe tag.
    pub slow_timeframe: Timeframe,
    /// Rows strictly ascending by timestamp.
    pub rows: Vec<MergedRow>,
    /// Fast rows dropped because they precede the slow series' start.
    pub causality_dropped: usize,
}

impl MergedTable {
    /// Number of merged rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
