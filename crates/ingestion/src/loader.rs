//! Raw bar loading and validation.
//!
//! Parses per-timeframe CSV exports (DATE/TIME/OHLC/TICKVOL, optional SPREAD)
//! into a normalized, ascending-sorted `TimeSeries`. Structural problems fail
//! fast; duplicate timestamps are a data-quality signal and keep the first
//! occurrence.

use std::path::Path;

use chrono::NaiveDateTime;
use csv::StringRecord;
use mtf_core::{Bar, Error, Result, TimeSeries, Timeframe};
use tracing::{info, warn};

/// Combined date+time parse format of the input artifacts.
pub const DATE_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Required input columns, in canonical lowercase form.
const REQUIRED_COLUMNS: [&str; 7] = ["date", "time", "open", "high", "low", "close", "tickvol"];

/// Load one raw bar series from a CSV artifact.
///
/// Fails with `MissingSource` if the path does not resolve to a readable
/// file, and with `Schema` naming the first absent required column. Header
/// matching is case-insensitive; an optional `spread` column is discarded.
pub fn load_series(path: impl AsRef<Path>, timeframe: Timeframe) -> Result<TimeSeries> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::missing_source(path));
    }

    // An existing-but-unreadable artifact is as missing as an absent one.
    let mut reader = csv::Reader::from_path(path).map_err(|_| Error::missing_source(path))?;
    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut bars = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1, first data row is line 2.
        bars.push(parse_bar(&record, &columns, i + 2)?);
    }

    bars.sort_by_key(|b: &Bar| b.time);
    let before = bars.len();
    bars.dedup_by_key(|b| b.time);
    let duplicates_dropped = before - bars.len();

    if duplicates_dropped > 0 {
        warn!(
            path = %path.display(),
            duplicates_dropped,
            "duplicate timestamps in raw series, kept first occurrence"
        );
    }
    info!(
        path = %path.display(),
        timeframe = timeframe.label(),
        rows = bars.len(),
        "loaded bar series"
    );

    let mut series = TimeSeries::new(timeframe, bars);
    series.duplicates_dropped = duplicates_dropped;
    Ok(series)
}

/// Column indices of the required fields within one artifact.
struct ColumnIndices {
    date: usize,
    time: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    tickvol: usize,
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnIndices> {
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::schema(name))
    };

    // Probe every required column so the first missing one is reported by
    // its canonical name before any row is processed.
    for name in REQUIRED_COLUMNS {
        find(name)?;
    }

    Ok(ColumnIndices {
        date: find("date")?,
        time: find("time")?,
        open: find("open")?,
        high: find("high")?,
        low: find("low")?,
        close: find("close")?,
        tickvol: find("tickvol")?,
    })
}

fn parse_bar(record: &StringRecord, columns: &ColumnIndices, line: usize) -> Result<Bar> {
    let field = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .ok_or_else(|| Error::parse(format!("line {line}: truncated record")))
    };

    let stamp = format!("{} {}", field(columns.date)?, field(columns.time)?);
    let time = NaiveDateTime::parse_from_str(&stamp, DATE_TIME_FORMAT)
        .map_err(|e| Error::parse(format!("line {line}: bad timestamp '{stamp}': {e}")))?;

    let number = |idx: usize, name: &str| -> Result<f64> {
        let raw = field(idx)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| Error::parse(format!("line {line}: bad {name} value '{raw}'")))
    };

    Ok(Bar {
        time,
        open: number(columns.open, "open")?,
        high: number(columns.high, "high")?,
        low: number(columns.low, "low")?,
        close: number(columns.close, "close")?,
        volume: number(columns.tickvol, "tickvol")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_basic() {
        let file = write_csv(
            "DATE,TIME,OPEN,HIGH,LOW,CLOSE,TICKVOL,SPREAD\n\
             2021.01.04,08:00:00,1.3550,1.3560,1.3540,1.3555,120,2\n\
             2021.01.04,08:15:00,1.3555,1.3570,1.3550,1.3565,98,2\n",
        );

        let series = load_series(file.path(), Timeframe::m15()).unwrap();
        assert_eq!(series.len(), 2);
        assert_abs_diff_eq!(series.bars[0].open, 1.3550, epsilon = 1e-12);
        assert_abs_diff_eq!(series.bars[1].close, 1.3565, epsilon = 1e-12);
        assert_abs_diff_eq!(series.bars[0].volume, 120.0, epsilon = 1e-12);
        assert_eq!(series.duplicates_dropped, 0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_series("no_such_file.csv", Timeframe::m15()).unwrap_err();
        assert!(matches!(err, Error::MissingSource { .. }));
        assert!(err.to_string().contains("no_such_file.csv"));
    }

    #[test]
    fn test_unreadable_path_is_missing_source() {
        // A directory exists but does not resolve to a readable artifact.
        let dir = tempfile::tempdir().unwrap();
        let err = load_series(dir.path(), Timeframe::m15()).unwrap_err();
        assert!(matches!(err, Error::MissingSource { .. }));
    }

    #[test]
    fn test_missing_close_column() {
        let file = write_csv(
            "DATE,TIME,OPEN,HIGH,LOW,TICKVOL\n\
             2021.01.04,08:00:00,1.3550,1.3560,1.3540,120\n",
        );

        let err = load_series(file.path(), Timeframe::m15()).unwrap_err();
        match err {
            Error::Schema(column) => assert_eq!(column, "close"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let file = write_csv(
            "DATE,TIME,OPEN,HIGH,LOW,CLOSE,TICKVOL\n\
             2021.01.04,08:30:00,1.3,1.3,1.3,1.3,10\n\
             2021.01.04,08:00:00,1.1,1.1,1.1,1.1,10\n\
             2021.01.04,08:15:00,1.2,1.2,1.2,1.2,10\n",
        );

        let series = load_series(file.path(), Timeframe::m15()).unwrap();
        let times: Vec<_> = series.bars.iter().map(|b| b.time).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_duplicate_timestamps_keep_first() {
        let file = write_csv(
            "DATE,TIME,OPEN,HIGH,LOW,CLOSE,TICKVOL\n\
             2021.01.04,08:00:00,1.10,1.10,1.10,1.10,10\n\
             2021.01.04,08:00:00,9.99,9.99,9.99,9.99,99\n\
             2021.01.04,08:15:00,1.20,1.20,1.20,1.20,10\n",
        );

        let series = load_series(file.path(), Timeframe::m15()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.duplicates_dropped, 1);
        assert_abs_diff_eq!(series.bars[0].close, 1.10, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let file = write_csv(
            "DATE,TIME,OPEN,HIGH,LOW,CLOSE,TICKVOL\n\
             2021-01-04,08:00:00,1.1,1.1,1.1,1.1,10\n",
        );

        let err = load_series(file.path(), Timeframe::m15()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_lowercase_headers_accepted() {
        let file = write_csv(
            "date,time,open,high,low,close,tickvol\n\
             2021.01.04,08:00:00,1.1,1.2,1.0,1.15,42\n",
        );

        let series = load_series(file.path(), Timeframe::m15()).unwrap();
        assert_eq!(series.len(), 1);
    }
}
