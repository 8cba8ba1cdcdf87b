//! Plain-text rendering of aggregation results.

use shootings_map_analytics::metric_range;
use shootings_map_analytics_models::AggregationResult;
use shootings_map_dataset::DatasetSummary;

const STATE_WIDTH: usize = 6;
const VALUE_WIDTH: usize = 14;

/// Renders the per-state table with the metric column starred, followed
/// by the colour scale range.
#[must_use]
pub fn render_table(result: &AggregationResult) -> String {
    if result.table.is_empty() {
        return "No incidents in the selected window.\n".to_string();
    }

    let mut out = format!("{:<STATE_WIDTH$}", "STATE");
    for column in &result.table.columns {
        let header = if *column == result.metric_column {
            format!("*{column}")
        } else {
            column.clone()
        };
        out.push_str(&format!(" {header:>VALUE_WIDTH$}"));
    }
    out.push('\n');
    out.push_str(&"-".repeat(STATE_WIDTH + (VALUE_WIDTH + 1) * result.table.columns.len()));
    out.push('\n');

    for row in &result.table.rows {
        out.push_str(&format!("{:<STATE_WIDTH$}", row.state));
        for value in &row.values {
            out.push_str(&format!(" {value:>VALUE_WIDTH$.1}"));
        }
        out.push('\n');
    }

    if let Some((lo, hi)) = metric_range(&result.table, &result.metric_column) {
        out.push_str(&format!(
            "\nMetric: {} (range {lo:.1} - {hi:.1})\n",
            result.metric_column
        ));
    }

    out
}

#[must_use]
pub fn render_summary(summary: &DatasetSummary) -> String {
    format!(
        "Records: {}\nDates:   {} to {}\nStates:  {} ({})\n",
        summary.records,
        summary.first_date,
        summary.last_date,
        summary.states.len(),
        summary.states.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shootings_map_analytics_models::{CategoryOption, StateRow, StateTable};

    use super::*;

    fn result() -> AggregationResult {
        AggregationResult {
            table: StateTable {
                columns: vec!["W".to_string(), "Total".to_string()],
                rows: vec![
                    StateRow {
                        state: "CA".to_string(),
                        values: vec![3.0, 5.0],
                    },
                    StateRow {
                        state: "TX".to_string(),
                        values: vec![1.0, 1.0],
                    },
                ],
            },
            options: vec![CategoryOption::new("W"), CategoryOption::new("Total")],
            metric_column: "Total".to_string(),
        }
    }

    #[test]
    fn renders_rows_and_metric() {
        let text = render_table(&result());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("STATE"));
        assert!(lines[0].contains("*Total"));
        assert!(lines[2].starts_with("CA"));
        assert!(lines[2].contains("3.0"));
        assert!(text.contains("Metric: Total (range 1.0 - 5.0)"));
    }

    #[test]
    fn renders_empty_window() {
        let mut empty = result();
        empty.table.rows.clear();
        assert_eq!(render_table(&empty), "No incidents in the selected window.\n");
    }

    #[test]
    fn renders_summary() {
        let summary = DatasetSummary {
            records: 2,
            first_date: NaiveDate::from_ymd_opt(2015, 1, 2).unwrap(),
            last_date: NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(),
            states: vec!["CA".to_string(), "TX".to_string()],
        };
        let text = render_summary(&summary);
        assert!(text.contains("2015-01-02 to 2020-06-15"));
        assert!(text.contains("2 (CA, TX)"));
    }
}
