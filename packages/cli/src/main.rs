#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the shootings map data core.
//!
//! Loads the dataset once, then answers aggregation, comparison and
//! slider-mark queries as text or JSON. Without a subcommand it drops into
//! an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`shootings_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the load spinner never fight for the terminal.

mod interactive;
mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shootings_map_analytics::{aggregate, compare, month_marks};
use shootings_map_analytics_models::{AggregationRequest, Mode, TOTAL_COLUMN, TimeWindow};
use shootings_map_cli_utils::{IndicatifProgress, MultiProgress};
use shootings_map_dataset::paths::resolve_dataset_path;
use shootings_map_dataset::progress::ProgressCallback as _;
use shootings_map_dataset::{Dataset, LoadOptions};
use shootings_map_incident_models::Dimension;

#[derive(Parser)]
#[command(name = "shootings_map", about = "Police shootings per-state aggregation tool")]
struct Cli {
    /// Path to the shootings CSV (overrides `SHOOTINGS_MAP_DATA`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// CSV field delimiter
    #[arg(long, global = true, default_value = ",")]
    delimiter: char,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Time window flags. Missing bounds default to the dataset's range.
#[derive(Args)]
struct WindowArgs {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the window (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl WindowArgs {
    fn resolve(&self, dataset: &Dataset) -> TimeWindow {
        let (first, last) = dataset.date_range();
        TimeWindow::from_dates(self.from.unwrap_or(first), self.to.unwrap_or(last))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show record count, date range and states
    Summary,
    /// List the dimensions the map can be grouped by
    Dimensions,
    /// Aggregate incidents per state
    Aggregate {
        #[command(flatten)]
        window: WindowArgs,
        /// Column to group by (e.g. "race", "flee", "age")
        #[arg(long, default_value = "race")]
        dimension: String,
        /// Category value to colour by
        #[arg(long, default_value = TOTAL_COLUMN)]
        sub: String,
        /// "cardinal" or "ratio"
        #[arg(long, default_value = "cardinal")]
        mode: Mode,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Aggregate two selections side by side over the same window and mode
    Compare {
        #[command(flatten)]
        window: WindowArgs,
        /// "cardinal" or "ratio"
        #[arg(long, default_value = "cardinal")]
        mode: Mode,
        /// Left-hand dimension
        #[arg(long, default_value = "race")]
        left: String,
        /// Left-hand category value
        #[arg(long, default_value = TOTAL_COLUMN)]
        left_sub: String,
        /// Right-hand dimension
        #[arg(long, default_value = "race")]
        right: String,
        /// Right-hand category value
        #[arg(long, default_value = TOTAL_COLUMN)]
        right_sub: String,
    },
    /// Print the time slider's month marks as JSON
    Marks {
        #[command(flatten)]
        window: WindowArgs,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = shootings_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let delimiter = u8::try_from(cli.delimiter)
        .map_err(|_| format!("Delimiter must be a single ASCII character: {}", cli.delimiter))?;
    if !needs_dataset(cli.command.as_ref()) {
        print_dimensions();
        return Ok(());
    }
    let dataset = load_or_exit(&cli, delimiter, &multi);

    let Some(command) = cli.command else {
        return interactive::run(&dataset);
    };

    match command {
        Commands::Summary => print!("{}", output::render_summary(&dataset.summary())),
        Commands::Dimensions => print_dimensions(),
        Commands::Aggregate {
            window,
            dimension,
            sub,
            mode,
            json,
        } => {
            let request = AggregationRequest::new(window.resolve(&dataset), dimension)
                .with_sub_selector(sub)
                .with_mode(mode);
            let result = aggregate(&dataset, &request);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", output::render_table(&result));
            }
        }
        Commands::Compare {
            window,
            mode,
            left,
            left_sub,
            right,
            right_sub,
        } => {
            let request = AggregationRequest::new(window.resolve(&dataset), left)
                .with_sub_selector(left_sub)
                .with_mode(mode);
            let comparison = compare(&dataset, &request, &right, &right_sub);
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        Commands::Marks { window } => {
            let marks = window
                .resolve(&dataset)
                .date_bounds()
                .map(|(start, end)| month_marks(start, end))
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&marks)?);
        }
    }

    Ok(())
}

/// Whether the command reads the dataset. `dimensions` only lists the
/// static catalogue.
const fn needs_dataset(command: Option<&Commands>) -> bool {
    !matches!(command, Some(Commands::Dimensions))
}

fn print_dimensions() {
    for dimension in Dimension::selectable() {
        println!("{dimension}");
    }
}

/// Loads the dataset, exiting with status 1 on failure.
fn load_or_exit(cli: &Cli, delimiter: u8, multi: &MultiProgress) -> Dataset {
    let path = resolve_dataset_path(cli.data.as_deref());
    let progress = IndicatifProgress::rows_spinner(multi, "Loading dataset");

    match shootings_map_dataset::load_with(&path, &LoadOptions { delimiter }, &progress) {
        Ok(dataset) => dataset,
        Err(e) => {
            progress.finish(String::from("Load failed"));
            eprintln!("Invalid dataset at {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_runs_without_a_dataset() {
        let cli = Cli::try_parse_from(["shootings_map", "dimensions"]).unwrap();
        assert!(!needs_dataset(cli.command.as_ref()));
    }

    #[test]
    fn other_commands_load_the_dataset() {
        for args in [
            vec!["shootings_map"],
            vec!["shootings_map", "summary"],
            vec!["shootings_map", "aggregate", "--dimension", "age"],
            vec!["shootings_map", "marks"],
        ] {
            let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
            assert!(needs_dataset(cli.command.as_ref()), "{args:?}");
        }
    }
}
