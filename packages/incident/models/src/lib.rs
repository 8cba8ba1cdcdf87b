#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Police shooting event record types and grouping dimensions.
//!
//! This crate defines the canonical shape of one shooting incident and the
//! set of columns the map can be grouped by. Both the dataset loader and
//! the aggregation engine speak in these types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column that incidents can be grouped by on the map.
///
/// Every variant except [`Dimension::Age`] is categorical and is counted per
/// state. `Age` is numeric and is averaged per state instead.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    /// How the subject died (e.g. "shot", "shot and Tasered")
    MannerOfDeath,
    /// What the subject was armed with, as reported
    Armed,
    /// Gender of the subject
    Gender,
    /// Race of the subject
    Race,
    /// City where the incident happened
    City,
    /// Whether the subject showed signs of mental illness
    SignsOfMentalIllness,
    /// Threat level assessed by the officers
    ThreatLevel,
    /// Whether and how the subject was fleeing
    Flee,
    /// Whether an officer body camera was recording
    BodyCamera,
    /// Broad category of the weapon
    ArmsCategory,
    /// Age of the subject (numeric)
    Age,
}

impl Dimension {
    /// Returns `true` if this dimension is counted per category value.
    #[must_use]
    pub const fn is_categorical(self) -> bool {
        !matches!(self, Self::Age)
    }

    /// Returns the dimensions offered in the map's main dropdown.
    ///
    /// `City` is left out: with thousands of distinct values it makes no
    /// sense as a per-state breakdown.
    #[must_use]
    pub const fn selectable() -> &'static [Self] {
        &[
            Self::MannerOfDeath,
            Self::Armed,
            Self::Gender,
            Self::Race,
            Self::SignsOfMentalIllness,
            Self::ThreatLevel,
            Self::Flee,
            Self::BodyCamera,
            Self::ArmsCategory,
            Self::Age,
        ]
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::MannerOfDeath,
            Self::Armed,
            Self::Gender,
            Self::Race,
            Self::City,
            Self::SignsOfMentalIllness,
            Self::ThreatLevel,
            Self::Flee,
            Self::BodyCamera,
            Self::ArmsCategory,
            Self::Age,
        ]
    }
}

/// One police shooting incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Two-letter state code (e.g. "CA").
    pub state: String,
    /// Calendar date of the incident.
    pub date: NaiveDate,
    pub manner_of_death: String,
    pub armed: String,
    pub gender: String,
    pub race: String,
    pub city: String,
    /// `"True"` or `"False"` once normalized.
    pub signs_of_mental_illness: String,
    pub threat_level: String,
    pub flee: String,
    /// `"True"` or `"False"` once normalized.
    pub body_camera: String,
    pub arms_category: String,
    /// Age of the subject, if known.
    pub age: Option<f64>,
}

impl EventRecord {
    /// Returns the text value of a categorical column, or `None` for
    /// [`Dimension::Age`].
    #[must_use]
    pub fn category(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::MannerOfDeath => &self.manner_of_death,
            Dimension::Armed => &self.armed,
            Dimension::Gender => &self.gender,
            Dimension::Race => &self.race,
            Dimension::City => &self.city,
            Dimension::SignsOfMentalIllness => &self.signs_of_mental_illness,
            Dimension::ThreatLevel => &self.threat_level,
            Dimension::Flee => &self.flee,
            Dimension::BodyCamera => &self.body_camera,
            Dimension::ArmsCategory => &self.arms_category,
            Dimension::Age => return None,
        };
        Some(value.as_str())
    }
}

/// Normalizes a boolean-like cell to the stable text `"True"` or `"False"`.
///
/// Accepts `true`/`false`, `1`/`0` and `yes`/`no` in any case. Anything else
/// is returned trimmed but otherwise untouched.
#[must_use]
pub fn normalize_flag(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => "True".to_string(),
        "false" | "0" | "no" => "False".to_string(),
        _ => trimmed.to_string(),
    }
}
