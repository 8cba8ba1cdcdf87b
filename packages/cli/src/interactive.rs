//! Interactive menu for exploring the dataset.
//!
//! Mirrors the dashboard's controls with `dialoguer` prompts: a time
//! window, a dimension, a sub-category and the cardinal/ratio toggle.

use chrono::NaiveDate;
use dialoguer::{Input, Select};
use shootings_map_analytics::{aggregate, compare, month_marks_for};
use shootings_map_analytics_models::{AggregationRequest, Mode, TOTAL_COLUMN, TimeWindow};
use shootings_map_dataset::Dataset;
use shootings_map_incident_models::Dimension;

use crate::output;

/// Top-level actions available in the interactive menu.
enum Action {
    Aggregate,
    Compare,
    Summary,
    MonthMarks,
}

impl Action {
    const ALL: &[Self] = &[Self::Aggregate, Self::Compare, Self::Summary, Self::MonthMarks];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Aggregate => "Aggregate per state",
            Self::Compare => "Compare two selections",
            Self::Summary => "Dataset summary",
            Self::MonthMarks => "Show slider month marks",
        }
    }
}

/// Runs the interactive menu against an already loaded dataset.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. no terminal attached).
pub fn run(dataset: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
    println!("Police Shootings in USA: per-state aggregation");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Aggregate => {
            let window = prompt_window(dataset)?;
            let request = prompt_selection(dataset, window, None)?;
            print!("{}", output::render_table(&aggregate(dataset, &request)));
        }
        Action::Compare => {
            let window = prompt_window(dataset)?;
            println!("Left map:");
            let left = prompt_selection(dataset, window, None)?;
            println!("Right map:");
            let right = prompt_selection(dataset, window, Some(left.mode))?;
            let comparison = compare(dataset, &left, &right.dimension, &right.sub_selector);
            println!("-- {} --", left.dimension);
            print!("{}", output::render_table(&comparison.left));
            println!("-- {} --", right.dimension);
            print!("{}", output::render_table(&comparison.right));
        }
        Action::Summary => print!("{}", output::render_summary(&dataset.summary())),
        Action::MonthMarks => {
            for mark in month_marks_for(dataset).values() {
                println!("{}", mark.label);
            }
        }
    }

    Ok(())
}

fn prompt_window(dataset: &Dataset) -> Result<TimeWindow, Box<dyn std::error::Error>> {
    let (first, last) = dataset.date_range();
    let start = prompt_date("From (YYYY-MM-DD)", first)?;
    let end = prompt_date("To (YYYY-MM-DD)", last)?;
    Ok(TimeWindow::from_dates(start, end))
}

fn prompt_date(prompt: &str, default: NaiveDate) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|s: &String| -> Result<(), String> {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|e| format!("Invalid date: {e}"))
        })
        .interact_text()?;
    Ok(NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")?)
}

/// Prompts for dimension, sub-category and (unless `mode` is fixed) the
/// cardinal/ratio toggle. Sub-category choices come from the window's
/// actual category values, like the dashboard's secondary dropdown.
fn prompt_selection(
    dataset: &Dataset,
    window: TimeWindow,
    mode: Option<Mode>,
) -> Result<AggregationRequest, Box<dyn std::error::Error>> {
    let dimensions = Dimension::selectable();
    let names: Vec<&str> = dimensions.iter().map(AsRef::<str>::as_ref).collect();
    let default_idx = dimensions
        .iter()
        .position(|d| *d == Dimension::Race)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Group by")
        .items(&names)
        .default(default_idx)
        .interact()?;

    let mut request = AggregationRequest::new(window, names[idx]);
    let preview = aggregate(dataset, &request);
    if !preview.shows_sub_selector() {
        return Ok(request.with_mode(mode.unwrap_or_default()));
    }

    let values = preview.category_values();
    let total_idx = values.iter().position(|v| *v == TOTAL_COLUMN).unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Colour by")
        .items(&values)
        .default(total_idx)
        .interact()?;
    request = request.with_sub_selector(values[idx]);

    let mode = match mode {
        Some(mode) => mode,
        None if values[idx] == TOTAL_COLUMN => Mode::Cardinal,
        None => {
            let modes = [Mode::Cardinal, Mode::Ratio];
            let labels: Vec<&str> = modes.iter().map(AsRef::<str>::as_ref).collect();
            let idx = Select::new()
                .with_prompt("Display")
                .items(&labels)
                .default(0)
                .interact()?;
            modes[idx]
        }
    };

    Ok(request.with_mode(mode))
}
