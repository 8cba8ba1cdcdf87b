#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-state aggregation engine behind the shootings choropleth.
//!
//! Every function here is a pure computation over the read-only
//! [`shootings_map_dataset::Dataset`]. A presentation layer calls
//! [`aggregate`] each time one of its controls changes and
//! [`month_marks`] once to label its time slider.

pub mod aggregate;
pub mod marks;

pub use aggregate::{aggregate, compare, full_window, metric_range};
pub use marks::{month_marks, month_marks_for};
