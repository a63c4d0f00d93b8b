//! The feature contract shared by the training and inference paths.
//!
//! A fixed, ordered set of feature names, and the single projection that
//! turns a `MergedRow` into a numeric vector in exactly that order. Both
//! model paths must consult this type rather than re-deriving column names,
//! so a drift between them is impossible by construction.
//!
//! Vectors are exposed unscaled; fitting and persisting a feature scaler is
//! the responsibility of the training/inference components.

use mtf_core::{Error, MergedRow, Result, Timeframe};
use tracing::warn;

/// Ordered feature names for one fast/slow timeframe pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureContract {
    names: Vec<String>,
}

impl FeatureContract {
    /// Build the contract for a timeframe pair.
    ///
    /// Order is fixed: fast log return, slow log return, fast volume, slow
    /// volume. The optional spread column is discarded at load time, so no
    /// spread feature carries through.
    pub fn for_timeframes(fast: &Timeframe, slow: &Timeframe) -> Self {
        Self {
            names: vec![
                fast.qualify("LogReturn"),
                slow.qualify("LogReturn"),
                fast.qualify("Vol"),
                slow.qualify("Vol"),
            ],
        }
    }

    /// Ordered feature names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the contract is empty (it never is for a valid pair).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Project one merged row onto the contract.
    ///
    /// Returns `None` when any feature is undefined (non-finite). Such rows
    /// are excluded entirely, never zero-filled: a silently substituted
    /// default would bias the learned or predicted signal.
    pub fn project(&self, row: &MergedRow) -> Option<FeatureVector> {
        let values = vec![
            row.fast.log_return,
            row.slow.log_return,
            row.fast.volume,
            row.slow.volume,
        ];
        debug_assert_eq!(values.len(), self.names.len());

        if values.iter().all(|v| v.is_finite()) {
            Some(FeatureVector { values })
        } else {
            None
        }
    }

    /// Project every usable row of a merged table.
    ///
    /// Fails with `NoUsableRows` if filtering leaves nothing, rather than
    /// handing an empty batch to a model path.
    pub fn project_table(&self, rows: &[MergedRow]) -> Result<Vec<FeatureVector>> {
        let vectors: Vec<FeatureVector> = rows.iter().filter_map(|r| self.project(r)).collect();

        let dropped = rows.len() - vectors.len();
        if dropped > 0 {
            warn!(dropped, "excluded rows with undefined features");
        }
        if vectors.is_empty() {
            return Err(Error::NoUsableRows);
        }
        Ok(vectors)
    }

    /// Feature vector of the newest usable row, the live-inference hand-off.
    pub fn latest_vector(&self, rows: &[MergedRow]) -> Result<FeatureVector> {
        rows.iter()
            .rev()
            .find_map(|r| self.project(r))
            .ok_or(Error::NoUsableRows)
    }
}

/// A fixed-length numeric projection of one row, in contract order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Feature values in contract order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The opaque predictive model seam.
///
/// Implementations receive an unscaled feature vector matching the contract
/// and return a probability in [0, 1].
pub trait Predictor {
    /// Score one feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use mtf_core::DerivedBar;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn row(fast_ret: f64, slow_ret: f64, fast_vol: f64, slow_vol: f64) -> MergedRow {
        let bar = |time, volume, log_return| DerivedBar {
            time,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume,
            log_return,
        };
        MergedRow {
            time: ts(8, 0),
            fast: bar(ts(8, 0), fast_vol, fast_ret),
            slow: bar(ts(4, 0), slow_vol, slow_ret),
        }
    }

    fn contract() -> FeatureContract {
        FeatureContract::for_timeframes(&Timeframe::m15(), &Timeframe::h4())
    }

    #[test]
    fn test_contract_names_order() {
        assert_eq!(
            contract().names(),
            &["LogReturn15m", "LogReturn4h", "Vol15m", "Vol4h"]
        );
    }

    #[test]
    fn test_projection_matches_name_order() {
        let c = contract();
        let vector = c.project(&row(0.01, 0.02, 120.0, 900.0)).unwrap();

        assert_eq!(vector.len(), c.len());
        assert_abs_diff_eq!(vector.values()[0], 0.01); // LogReturn15m
        assert_abs_diff_eq!(vector.values()[1], 0.02); // LogReturn4h
        assert_abs_diff_eq!(vector.values()[2], 120.0); // Vol15m
        assert_abs_diff_eq!(vector.values()[3], 900.0); // Vol4h
    }

    #[test]
    fn test_undefined_feature_drops_row() {
        let c = contract();
        assert!(c.project(&row(f64::NAN, 0.02, 120.0, 900.0)).is_none());
        assert!(c.project(&row(0.01, f64::INFINITY, 120.0, 900.0)).is_none());
    }

    #[test]
    fn test_project_table_filters_and_keeps_rest() {
        let c = contract();
        let rows = vec![
            row(0.01, 0.02, 120.0, 900.0),
            row(f64::NAN, 0.02, 120.0, 900.0),
            row(0.03, 0.04, 130.0, 910.0),
        ];
        let vectors = c.project_table(&rows).unwrap();
        assert_eq!(vectors.len(), 2);
    }

    #[test]
    fn test_all_rows_undefined_is_no_usable_rows() {
        let c = contract();
        let rows = vec![row(f64::NAN, 0.02, 120.0, 900.0)];
        assert!(matches!(
            c.project_table(&rows).unwrap_err(),
            Error::NoUsableRows
        ));
        assert!(matches!(
            c.latest_vector(&rows).unwrap_err(),
            Error::NoUsableRows
        ));
    }

    #[test]
    fn test_latest_vector_skips_trailing_bad_row() {
        let c = contract();
        let rows = vec![
            row(0.01, 0.02, 120.0, 900.0),
            row(f64::NAN, 0.02, 125.0, 905.0),
        ];
        let latest = c.latest_vector(&rows).unwrap();
        assert_abs_diff_eq!(latest.values()[0], 0.01);
    }
}
