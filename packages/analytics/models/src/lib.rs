#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation request and result types for the shootings map.
//!
//! A presentation layer fills in an [`AggregationRequest`] from its
//! controls (time slider, dimension dropdown, sub-category dropdown and
//! cardinal/ratio toggle) and gets back an [`AggregationResult`] holding
//! the per-state table, the options for the sub-category dropdown and the
//! column that should drive the map's colour scale.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the row-wise sum column, also the sub-selector sentinel.
pub const TOTAL_COLUMN: &str = "Total";

/// Column used for a category value that is literally `"Total"`.
pub const TOTAL_VALUE_COLUMN: &str = "Total (value)";

/// Name of the mean-age column used for the age dimension.
pub const AGE_COLUMN: &str = "age";

/// Converts a calendar date to the millisecond epoch of its UTC midnight.
#[must_use]
pub fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Inclusive time window expressed as millisecond epochs, as delivered by
/// a range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// Window start (inclusive), milliseconds since the Unix epoch.
    pub start_ms: i64,
    /// Window end (inclusive), milliseconds since the Unix epoch.
    pub end_ms: i64,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Window spanning from the start of `start` to the start of `end`.
    #[must_use]
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(date_to_millis(start), date_to_millis(end))
    }

    /// Returns the window's bounds truncated to UTC calendar days.
    ///
    /// `None` if either instant is out of range or the window is inverted;
    /// such a window matches nothing.
    #[must_use]
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        if self.start_ms > self.end_ms {
            return None;
        }
        let start = DateTime::from_timestamp_millis(self.start_ms)?.date_naive();
        let end = DateTime::from_timestamp_millis(self.end_ms)?.date_naive();
        Some((start, end))
    }
}

/// How category columns are expressed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Raw incident counts.
    #[default]
    Cardinal,
    /// Percentage of the state's total incidents in the window.
    Ratio,
}

/// Parameters for one map recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRequest {
    /// Time window to keep.
    pub window: TimeWindow,
    /// Column to group by (`"race"`, `"flee"`, ..., or `"age"`).
    pub dimension: String,
    /// Category value to colour the map by, or `"Total"`.
    pub sub_selector: String,
    /// Cardinal or ratio display.
    pub mode: Mode,
}

impl AggregationRequest {
    /// Creates a request for the `Total` metric in cardinal mode.
    #[must_use]
    pub fn new(window: TimeWindow, dimension: impl Into<String>) -> Self {
        Self {
            window,
            dimension: dimension.into(),
            sub_selector: TOTAL_COLUMN.to_string(),
            mode: Mode::Cardinal,
        }
    }

    #[must_use]
    pub fn with_sub_selector(mut self, sub_selector: impl Into<String>) -> Self {
        self.sub_selector = sub_selector.into();
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// One entry of the sub-category dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    /// Text shown to the user.
    pub label: String,
    /// Value sent back as the sub-selector.
    pub value: String,
}

impl CategoryOption {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// One state's values, aligned with [`StateTable::columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRow {
    /// Two-letter state code.
    pub state: String,
    /// One value per column; never `NaN`.
    pub values: Vec<f64>,
}

/// Wide per-state table: one row per state, one numeric column per
/// category value (plus `Total`), or a single `age` column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTable {
    /// Column names in display order.
    pub columns: Vec<String>,
    /// Rows ordered by state code.
    pub rows: Vec<StateRow>,
}

impl StateTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of `column` in [`Self::columns`].
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Looks up the row for `state`.
    #[must_use]
    pub fn row(&self, state: &str) -> Option<&StateRow> {
        self.rows.iter().find(|r| r.state == state)
    }

    /// Value of `column` for `state`, if both exist.
    #[must_use]
    pub fn value(&self, state: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.row(state).map(|r| r.values[idx])
    }

    /// All values of `column`, in row order.
    #[must_use]
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }
}

/// Output of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// The per-state table.
    pub table: StateTable,
    /// Options for the sub-category dropdown (empty when the window holds
    /// no incidents).
    pub options: Vec<CategoryOption>,
    /// Column that drives the colour scale.
    pub metric_column: String,
}

impl AggregationResult {
    /// The option values, in dropdown order.
    #[must_use]
    pub fn category_values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    /// Whether the sub-category dropdown has anything meaningful to offer.
    #[must_use]
    pub fn shows_sub_selector(&self) -> bool {
        !self.options.is_empty() && self.metric_column != AGE_COLUMN
    }

    /// Whether the cardinal/ratio toggle applies (a concrete category is
    /// selected).
    #[must_use]
    pub fn shows_mode_toggle(&self) -> bool {
        self.shows_sub_selector() && self.metric_column != TOTAL_COLUMN
    }
}

/// Two aggregations over the same window and mode, shown side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub left: AggregationResult,
    pub right: AggregationResult,
}

/// CSS applied to a slider label: rotated so month labels do not overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStyle {
    pub transform: String,
    pub transform_origin: String,
    pub text_align: String,
    pub width: String,
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            transform: "rotate(-90deg) translateY(-305%)".to_string(),
            transform_origin: "right top".to_string(),
            text_align: "left".to_string(),
            width: "fit-content".to_string(),
        }
    }
}

/// A labelled tick on the time slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthMark {
    /// `YYYY-MM`.
    pub label: String,
    pub style: MarkStyle,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_to_millis_is_utc_midnight() {
        assert_eq!(date_to_millis(date(1970, 1, 1)), 0);
        assert_eq!(date_to_millis(date(1970, 1, 2)), 86_400_000);
    }

    #[test]
    fn window_bounds_truncate_to_days() {
        let window = TimeWindow::new(
            date_to_millis(date(2020, 2, 1)) + 3_600_000,
            date_to_millis(date(2020, 2, 28)) + 3_600_000,
        );
        assert_eq!(
            window.date_bounds(),
            Some((date(2020, 2, 1), date(2020, 2, 28)))
        );
    }

    #[test]
    fn inverted_window_has_no_bounds() {
        let window = TimeWindow::from_dates(date(2020, 3, 1), date(2020, 2, 1));
        assert_eq!(window.date_bounds(), None);
    }

    #[test]
    fn out_of_range_window_has_no_bounds() {
        let window = TimeWindow::new(i64::MIN, i64::MAX);
        assert_eq!(window.date_bounds(), None);
    }

    #[test]
    fn mode_parses_lowercase() {
        assert_eq!(Mode::from_str("ratio").unwrap(), Mode::Ratio);
        assert_eq!(Mode::from_str("cardinal").unwrap(), Mode::Cardinal);
        assert_eq!(Mode::default(), Mode::Cardinal);
        assert!(Mode::from_str("log").is_err());
    }

    #[test]
    fn request_defaults_to_total() {
        let request = AggregationRequest::new(TimeWindow::new(0, 1), "race");
        assert_eq!(request.sub_selector, TOTAL_COLUMN);
        assert_eq!(request.mode, Mode::Cardinal);
        let request = request.with_sub_selector("W").with_mode(Mode::Ratio);
        assert_eq!(request.sub_selector, "W");
        assert_eq!(request.mode, Mode::Ratio);
    }

    #[test]
    fn table_lookups() {
        let table = StateTable {
            columns: vec!["W".to_string(), "B".to_string(), TOTAL_COLUMN.to_string()],
            rows: vec![
                StateRow {
                    state: "CA".to_string(),
                    values: vec![1.0, 2.0, 3.0],
                },
                StateRow {
                    state: "TX".to_string(),
                    values: vec![4.0, 0.0, 4.0],
                },
            ],
        };
        assert_eq!(table.value("CA", "B"), Some(2.0));
        assert_eq!(table.value("TX", "Total"), Some(4.0));
        assert_eq!(table.value("NY", "Total"), None);
        assert_eq!(table.value("CA", "H"), None);
        assert_eq!(table.column("W"), Some(vec![1.0, 4.0]));
    }

    #[test]
    fn selector_visibility() {
        let mut result = AggregationResult {
            table: StateTable::default(),
            options: vec![CategoryOption::new("W"), CategoryOption::new(TOTAL_COLUMN)],
            metric_column: TOTAL_COLUMN.to_string(),
        };
        assert!(result.shows_sub_selector());
        assert!(!result.shows_mode_toggle());

        result.metric_column = "W%".to_string();
        assert!(result.shows_mode_toggle());

        result.options = vec![CategoryOption::new(AGE_COLUMN)];
        result.metric_column = AGE_COLUMN.to_string();
        assert!(!result.shows_sub_selector());
        assert!(!result.shows_mode_toggle());
    }

    #[test]
    fn serializes_camel_case() {
        let mark = MonthMark {
            label: "2020-01".to_string(),
            style: MarkStyle::default(),
        };
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(json["style"]["transformOrigin"], "right top");
        assert_eq!(json["label"], "2020-01");
    }
}
