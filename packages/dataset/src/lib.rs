#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the police shootings CSV into the canonical in-memory table.
//!
//! The file is read once at startup. Rows that describe the same incident
//! (identical state, date and categorical columns) are merged into one
//! record whose age is the mean of the merged ages. The resulting
//! [`Dataset`] is immutable and is handed by reference to every
//! aggregation call.

pub mod parsing;
pub mod paths;
pub mod progress;

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shootings_map_incident_models::{EventRecord, normalize_flag};
use thiserror::Error;

use crate::parsing::{parse_age, parse_event_date};
use crate::progress::{ProgressCallback, null_progress};

/// Columns the CSV header must contain.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "state",
    "date",
    "manner_of_death",
    "armed",
    "gender",
    "race",
    "city",
    "signs_of_mental_illness",
    "threat_level",
    "flee",
    "body_camera",
    "arms_category",
    "age",
];

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV itself is malformed (bad quoting, wrong field count, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a required column.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A `date` cell could not be parsed.
    #[error("Invalid date '{value}' on line {line}")]
    InvalidDate {
        /// 1-based line number in the file.
        line: u64,
        /// Offending cell contents.
        value: String,
    },

    /// An `age` cell is present but not numeric.
    #[error("Invalid age '{value}' on line {line}")]
    InvalidAge {
        /// 1-based line number in the file.
        line: u64,
        /// Offending cell contents.
        value: String,
    },

    /// The file parsed to zero usable rows.
    #[error("Empty: the dataset contains no usable rows")]
    Empty,
}

/// Options controlling how the CSV is read.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Field delimiter (default: comma).
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// One CSV row before validation. Extra columns (`id`, `name`, ...) are
/// ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    state: String,
    date: String,
    manner_of_death: String,
    armed: String,
    gender: String,
    race: String,
    city: String,
    signs_of_mental_illness: String,
    threat_level: String,
    flee: String,
    body_camera: String,
    arms_category: String,
    age: String,
}

/// Everything but `age`: the identity of an incident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    state: String,
    date: NaiveDate,
    categories: [String; 10],
}

impl GroupKey {
    /// Returns `None` if any key column is blank.
    fn from_record(record: &EventRecord) -> Option<Self> {
        let categories = [
            record.manner_of_death.clone(),
            record.armed.clone(),
            record.gender.clone(),
            record.race.clone(),
            record.city.clone(),
            record.signs_of_mental_illness.clone(),
            record.threat_level.clone(),
            record.flee.clone(),
            record.body_camera.clone(),
            record.arms_category.clone(),
        ];
        if record.state.is_empty() || categories.iter().any(String::is_empty) {
            return None;
        }
        Some(Self {
            state: record.state.clone(),
            date: record.date,
            categories,
        })
    }
}

/// The canonical, deduplicated table of incidents.
///
/// Always holds at least one record.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<EventRecord>,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

/// High-level description of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Number of canonical records.
    pub records: usize,
    /// Earliest incident date.
    pub first_date: NaiveDate,
    /// Latest incident date.
    pub last_date: NaiveDate,
    /// Distinct state codes, sorted.
    pub states: Vec<String>,
}

impl Dataset {
    /// Builds the canonical table from raw records, merging duplicates and
    /// dropping records with a blank grouping key.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Empty`] if no record survives.
    pub fn from_records(records: Vec<EventRecord>) -> Result<Self, LoadError> {
        let (records, dropped) = canonicalize(records);
        if dropped > 0 {
            log::warn!("Dropped {dropped} row(s) with a blank state or category");
        }

        let first_date = records.iter().map(|r| r.date).min().ok_or(LoadError::Empty)?;
        let last_date = records.iter().map(|r| r.date).max().ok_or(LoadError::Empty)?;

        Ok(Self {
            records,
            first_date,
            last_date,
        })
    }

    /// Returns the canonical records in first-appearance order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of canonical records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false` for a successfully built dataset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest incident dates.
    #[must_use]
    pub const fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_date, self.last_date)
    }

    /// Distinct state codes present in the dataset.
    #[must_use]
    pub fn states(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.state.as_str()).collect()
    }

    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.len(),
            first_date: self.first_date,
            last_date: self.last_date,
            states: self.states().into_iter().map(str::to_string).collect(),
        }
    }
}

/// Merges records sharing a [`GroupKey`], averaging their known ages.
///
/// Returns the merged records in first-appearance order and the number of
/// records dropped for having a blank key column.
fn canonicalize(records: Vec<EventRecord>) -> (Vec<EventRecord>, usize) {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(EventRecord, f64, u32)> = Vec::new();
    let mut dropped = 0;

    for record in records {
        let Some(key) = GroupKey::from_record(&record) else {
            dropped += 1;
            continue;
        };

        match index.entry(key) {
            Entry::Occupied(entry) => {
                let group = &mut groups[*entry.get()];
                if let Some(age) = record.age {
                    group.1 += age;
                    group.2 += 1;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(groups.len());
                let (sum, count) = record.age.map_or((0.0, 0), |age| (age, 1));
                groups.push((record, sum, count));
            }
        }
    }

    let merged = groups
        .into_iter()
        .map(|(mut record, sum, count)| {
            record.age = (count > 0).then(|| sum / f64::from(count));
            record
        })
        .collect();

    (merged, dropped)
}

/// Loads the dataset at `path` with default options.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, is malformed, or holds
/// no usable rows.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    load_with(path, &LoadOptions::default(), &null_progress())
}

/// Loads the dataset at `path`, reporting each parsed row to `progress`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, is malformed, or holds
/// no usable rows.
pub fn load_with(
    path: &Path,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, LoadError> {
    log::info!("Loading dataset from {}", path.display());

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    progress.set_message(format!("Reading {}", path.display()));
    let dataset = read(file, options, progress)?;
    progress.finish(format!("Loaded {} records", dataset.len()));

    Ok(dataset)
}

/// Loads the dataset from any reader (in-memory buffers, stdin, ...).
///
/// # Errors
///
/// Returns [`LoadError`] if the data is malformed or holds no usable rows.
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, LoadError> {
    read(reader, options, &null_progress())
}

fn read<R: Read>(
    reader: R,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::MissingColumn {
                column: (*column).to_string(),
            });
        }
    }

    let mut records = Vec::new();
    let mut blank_dates = 0_usize;

    for result in reader.records() {
        let row = result?;
        let line = row.position().map_or(0, csv::Position::line);
        let raw: RawRecord = row.deserialize(Some(&headers))?;
        progress.inc(1);

        if raw.date.is_empty() {
            blank_dates += 1;
            continue;
        }
        records.push(into_event(raw, line)?);
    }

    if blank_dates > 0 {
        log::warn!("Dropped {blank_dates} row(s) with a blank date");
    }

    let raw_count = records.len();
    if raw_count == 0 {
        return Err(LoadError::Empty);
    }

    let dataset = Dataset::from_records(records)?;
    log::info!(
        "Parsed {raw_count} rows into {} canonical records",
        dataset.len()
    );

    Ok(dataset)
}

fn into_event(raw: RawRecord, line: u64) -> Result<EventRecord, LoadError> {
    let date = parse_event_date(&raw.date).ok_or_else(|| LoadError::InvalidDate {
        line,
        value: raw.date.clone(),
    })?;
    let age = parse_age(&raw.age).map_err(|_| LoadError::InvalidAge {
        line,
        value: raw.age.clone(),
    })?;

    Ok(EventRecord {
        state: raw.state.to_uppercase(),
        date,
        manner_of_death: raw.manner_of_death,
        armed: raw.armed,
        gender: raw.gender,
        race: raw.race,
        city: raw.city,
        signs_of_mental_illness: normalize_flag(&raw.signs_of_mental_illness),
        threat_level: raw.threat_level,
        flee: raw.flee,
        body_camera: normalize_flag(&raw.body_camera),
        arms_category: raw.arms_category,
        age,
    })
}
