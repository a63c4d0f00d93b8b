//! Merged-table export.
//!
//! Serializes the aligned table to a CSV artifact with a stable column
//! order: Time, then fast OHLCV + log return, then slow OHLCV + log return.
//! The slow timestamp is dropped after the join and never exported.
//!
//! Writes go to a sibling temp file that is atomically renamed into place,
//! so a reader never observes a partial artifact and a failed run leaves
//! the previous artifact untouched.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use mtf_core::{MergedRow, MergedTable, Result, Timeframe};
use tracing::info;

/// Timestamp format of the exported `Time` column.
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the merged table to `path`, returning the row count written.
pub fn export_csv(path: impl AsRef<Path>, table: &MergedTable) -> Result<usize> {
    let path = path.as_ref();
    let tmp = tmp_path(path);

    match write_table(&tmp, table) {
        Ok(rows) => {
            fs::rename(&tmp, path)?;
            info!(path = %path.display(), rows, "exported merged table");
            Ok(rows)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_table(path: &Path, table: &MergedTable) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(header_row(&table.fast_timeframe, &table.slow_timeframe))?;
    for row in &table.rows {
        writer.write_record(data_row(row))?;
    }
    writer.flush()?;

    Ok(table.rows.len())
}

fn header_row(fast: &Timeframe, slow: &Timeframe) -> Vec<String> {
    let mut headers = vec!["Time".to_string()];
    for timeframe in [fast, slow] {
        for field in ["Open", "High", "Low", "Close", "Vol"] {
            headers.push(timeframe.qualify(field));
        }
        headers.push(timeframe.qualify("LogReturn"));
    }
    headers
}

fn data_row(row: &MergedRow) -> Vec<String> {
    let mut record = vec![row.time.format(EXPORT_TIME_FORMAT).to_string()];
    for bar in [&row.fast, &row.slow] {
        record.push(bar.open.to_string());
        record.push(bar.high.to_string());
        record.push(bar.low.to_string());
        record.push(bar.close.to_string());
        record.push(bar.volume.to_string());
        record.push(bar.log_return.to_string());
    }
    record
}
