//! Configuration structures for the mtf-merge pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Timeframe;

/// Main configuration for one merge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Fast-timeframe input series (drives the output grid).
    pub fast: SourceConfig,
    /// Slow-timeframe input series (forward-filled onto the fast grid).
    pub slow: SourceConfig,
    /// Path of the merged output artifact.
    pub output_path: PathBuf,
    /// Path of the signal artifact written by the inference path.
    pub signal_path: PathBuf,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            fast: SourceConfig {
                path: PathBuf::from("data/GBPUSD_M15.csv"),
                label: "15m".to_string(),
                period_minutes: 15,
            },
            slow: SourceConfig {
                path: PathBuf::from("data/GBPUSD_H4.csv"),
                label: "4h".to_string(),
                period_minutes: 240,
            },
            output_path: PathBuf::from("merged_data.csv"),
            signal_path: PathBuf::from("signal.csv"),
        }
    }
}

impl MergeConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::missing_source(path));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// One input series: where to read it and how to tag its timeframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path of the raw bar CSV.
    pub path: PathBuf,
    /// Column-qualification label (e.g. "15m").
    pub label: String,
    /// Sampling period in minutes.
    pub period_minutes: i64,
}

impl SourceConfig {
    /// Timeframe tag for this source.
    pub fn timeframe(&self) -> Timeframe {
        Timeframe::new(self.label.clone(), self.period_minutes)
    }
}
