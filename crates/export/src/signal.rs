//! Signal artifact writing.
//!
//! The inference path hands one probability per run to an external consumer
//! through a single-line file, overwritten wholesale. Same temp-then-rename
//! discipline as the table exporter; there are no append semantics.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use mtf_core::{Error, Result};
use tracing::info;

/// Write one probability to the signal artifact, 6 decimal places.
pub fn write_signal(path: impl AsRef<Path>, probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::prediction(format!(
            "probability {probability} outside [0, 1]"
        )));
    }

    let path = path.as_ref();
    let tmp = tmp_path(path);
    fs::write(&tmp, format!("{probability:.6}\n"))?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), probability, "wrote signal");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
