//! Time filtering, grouping and pivoting of incidents per state.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr as _;

use shootings_map_analytics_models::{
    AGE_COLUMN, AggregationRequest, AggregationResult, CategoryOption, ComparisonResult, Mode,
    StateRow, StateTable, TOTAL_COLUMN, TOTAL_VALUE_COLUMN, TimeWindow,
};
use shootings_map_dataset::Dataset;
use shootings_map_incident_models::{Dimension, EventRecord};

/// Window covering every incident in the dataset, the slider's initial
/// value.
#[must_use]
pub fn full_window(dataset: &Dataset) -> TimeWindow {
    let (first, last) = dataset.date_range();
    TimeWindow::from_dates(first, last)
}

/// Recomputes the per-state table for one request.
///
/// Unknown dimensions and windows matching nothing give an empty table
/// and no options. A sub-selector that is not one of the window's
/// category values falls back to `Total`.
#[must_use]
pub fn aggregate(dataset: &Dataset, request: &AggregationRequest) -> AggregationResult {
    log::debug!(
        "Aggregating by {} (sub={}, mode={}) over {:?}",
        request.dimension,
        request.sub_selector,
        request.mode,
        request.window
    );

    let Ok(dimension) = Dimension::from_str(&request.dimension) else {
        log::debug!("Unknown dimension '{}'", request.dimension);
        return empty_result(TOTAL_COLUMN);
    };

    let rows = filter_window(dataset, request.window);
    if rows.is_empty() {
        return empty_result(if dimension.is_categorical() {
            TOTAL_COLUMN
        } else {
            AGE_COLUMN
        });
    }

    if dimension.is_categorical() {
        aggregate_counts(&rows, dimension, &request.sub_selector, request.mode)
    } else {
        aggregate_age(&rows)
    }
}

/// Aggregates two selections over the same window and mode.
///
/// The right-hand side reuses `left`'s window and mode with its own
/// dimension and sub-selector.
#[must_use]
pub fn compare(
    dataset: &Dataset,
    left: &AggregationRequest,
    right_dimension: &str,
    right_sub_selector: &str,
) -> ComparisonResult {
    let right = AggregationRequest::new(left.window, right_dimension)
        .with_sub_selector(right_sub_selector)
        .with_mode(left.mode);

    ComparisonResult {
        left: aggregate(dataset, left),
        right: aggregate(dataset, &right),
    }
}

/// Colour scale bounds: `(min, max)` of `column` over the table.
///
/// `None` if the table is empty or has no such column.
#[must_use]
pub fn metric_range(table: &StateTable, column: &str) -> Option<(f64, f64)> {
    let values = table.column(column)?;
    values.iter().copied().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn empty_result(metric_column: &str) -> AggregationResult {
    AggregationResult {
        table: StateTable::default(),
        options: Vec::new(),
        metric_column: metric_column.to_string(),
    }
}

fn filter_window(dataset: &Dataset, window: TimeWindow) -> Vec<&EventRecord> {
    let Some((start, end)) = window.date_bounds() else {
        return Vec::new();
    };
    dataset
        .records()
        .iter()
        .filter(|r| (start..=end).contains(&r.date))
        .collect()
}

/// Mean age per state. States whose incidents carry no age get `0`.
fn aggregate_age(rows: &[&EventRecord]) -> AggregationResult {
    let mut per_state: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for row in rows {
        let entry = per_state.entry(row.state.as_str()).or_default();
        if let Some(age) = row.age {
            entry.0 += age;
            entry.1 += 1;
        }
    }

    let rows = per_state
        .into_iter()
        .map(|(state, (sum, count))| StateRow {
            state: state.to_string(),
            values: vec![if count == 0 {
                0.0
            } else {
                sum / f64::from(count)
            }],
        })
        .collect();

    AggregationResult {
        table: StateTable {
            columns: vec![AGE_COLUMN.to_string()],
            rows,
        },
        options: vec![CategoryOption::new(AGE_COLUMN)],
        metric_column: AGE_COLUMN.to_string(),
    }
}

/// Counts per (state, category value), pivoted to one column per value
/// plus `Total`.
fn aggregate_counts(
    rows: &[&EventRecord],
    dimension: Dimension,
    sub_selector: &str,
    mode: Mode,
) -> AggregationResult {
    let mut values: Vec<&str> = Vec::new();
    let mut value_index: HashMap<&str, usize> = HashMap::new();
    let mut counts: BTreeMap<&str, Vec<u32>> = BTreeMap::new();

    for row in rows {
        let value = column_label(row.category(dimension).unwrap_or_default());
        let idx = *value_index.entry(value).or_insert_with(|| {
            values.push(value);
            values.len() - 1
        });

        let state_counts = counts.entry(row.state.as_str()).or_default();
        if state_counts.len() <= idx {
            state_counts.resize(idx + 1, 0);
        }
        state_counts[idx] += 1;
    }

    let selected = sub_selector != TOTAL_COLUMN && values.contains(&sub_selector);
    let ratio = selected && mode == Mode::Ratio;

    let mut columns: Vec<String> = values
        .iter()
        .map(|v| if ratio { format!("{v}%") } else { (*v).to_string() })
        .collect();
    columns.push(TOTAL_COLUMN.to_string());

    let table_rows = counts
        .into_iter()
        .map(|(state, mut state_counts)| {
            state_counts.resize(values.len(), 0);
            let total: u32 = state_counts.iter().sum();
            let mut row_values: Vec<f64> = state_counts
                .iter()
                .map(|&n| {
                    if ratio {
                        percentage(n, total)
                    } else {
                        f64::from(n)
                    }
                })
                .collect();
            row_values.push(f64::from(total));
            StateRow {
                state: state.to_string(),
                values: row_values,
            }
        })
        .collect();

    let metric_column = match (selected, ratio) {
        (true, true) => format!("{sub_selector}%"),
        (true, false) => sub_selector.to_string(),
        (false, _) => TOTAL_COLUMN.to_string(),
    };

    let mut options: Vec<CategoryOption> = values.iter().map(|v| CategoryOption::new(v)).collect();
    options.push(CategoryOption::new(TOTAL_COLUMN));

    AggregationResult {
        table: StateTable {
            columns,
            rows: table_rows,
        },
        options,
        metric_column,
    }
}

/// Column name for a category value. A value spelled like the `Total`
/// column is renamed so it cannot shadow the row sum.
fn column_label(value: &str) -> &str {
    if value == TOTAL_COLUMN {
        TOTAL_VALUE_COLUMN
    } else {
        value
    }
}

/// `count / total * 100`, or `0` when the state has no incidents.
fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(total) * 100.0
    }
}
