//! Month labels for the time slider.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Months, NaiveDate};
use shootings_map_analytics_models::{MarkStyle, MonthMark, date_to_millis};
use shootings_map_dataset::Dataset;

/// One mark per first-of-month from `start`'s month through `end`'s month,
/// keyed by the millisecond epoch of that day's UTC midnight.
///
/// Steps by calendar month, so month lengths never make the marks drift.
/// Returns an empty map if `end` falls in an earlier month than `start`.
#[must_use]
pub fn month_marks(start: NaiveDate, end: NaiveDate) -> BTreeMap<i64, MonthMark> {
    let mut marks = BTreeMap::new();
    let (Some(mut current), Some(last)) = (start.with_day(1), end.with_day(1)) else {
        return marks;
    };

    while current <= last {
        marks.insert(
            date_to_millis(current),
            MonthMark {
                label: current.format("%Y-%m").to_string(),
                style: MarkStyle::default(),
            },
        );
        let Some(next) = current.checked_add_months(Months::new(1)) else {
            break;
        };
        current = next;
    }

    marks
}

/// Marks spanning the whole dataset.
#[must_use]
pub fn month_marks_for(dataset: &Dataset) -> BTreeMap<i64, MonthMark> {
    let (first, last) = dataset.date_range();
    month_marks(first, last)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Datelike as _};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expected_len(start: NaiveDate, end: NaiveDate) -> i64 {
        let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month());
        months(end) - months(start) + 1
    }

    #[test]
    fn covers_every_month_inclusive() {
        let marks = month_marks(date(2015, 1, 2), date(2020, 6, 15));
        assert_eq!(marks.len() as i64, expected_len(date(2015, 1, 2), date(2020, 6, 15)));
        assert_eq!(marks.len(), 66);

        let labels: Vec<&str> = marks.values().map(|m| m.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"2015-01"));
        assert_eq!(labels.last(), Some(&"2020-06"));
    }

    #[test]
    fn keys_are_first_of_month_and_match_labels() {
        let marks = month_marks(date(2019, 11, 30), date(2020, 3, 1));
        let mut previous = i64::MIN;
        for (millis, mark) in &marks {
            assert!(*millis > previous);
            previous = *millis;
            let day = DateTime::from_timestamp_millis(*millis).unwrap().date_naive();
            assert_eq!(day.day(), 1);
            assert_eq!(day.format("%Y-%m").to_string(), mark.label);
        }
        assert_eq!(marks.len(), 5);
    }

    #[test]
    fn does_not_drift_over_short_months() {
        let marks = month_marks(date(2020, 1, 31), date(2020, 3, 31));
        let labels: Vec<&str> = marks.values().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["2020-01", "2020-02", "2020-03"]);
    }

    #[test]
    fn same_month_gives_one_mark() {
        let marks = month_marks(date(2020, 2, 3), date(2020, 2, 27));
        assert_eq!(marks.len(), 1);
        assert_eq!(marks.keys().next(), Some(&date_to_millis(date(2020, 2, 1))));
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(month_marks(date(2020, 5, 1), date(2020, 4, 30)).is_empty());
    }

    #[test]
    fn marks_carry_rotated_style() {
        let marks = month_marks(date(2020, 5, 1), date(2020, 5, 1));
        let mark = marks.values().next().unwrap();
        assert_eq!(mark.style, MarkStyle::default());
        assert!(mark.style.transform.starts_with("rotate(-90deg)"));
    }
}
