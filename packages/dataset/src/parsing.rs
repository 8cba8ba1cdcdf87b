//! Cell parsing for the shootings CSV.
//!
//! Dates arrive as plain `YYYY-MM-DD` in the published dataset, but some
//! exports carry a time component, so a few timestamp shapes are accepted
//! too and truncated to their calendar day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses an incident date. Returns `None` if no known format matches.
#[must_use]
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.date());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parses an optional age cell.
///
/// Blank cells and the usual missing-value markers (`NA`, `NaN`, `null`)
/// give `Ok(None)`.
///
/// # Errors
///
/// Returns the parse error if the cell is present but not a number.
pub fn parse_age(s: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let s = s.trim();
    if s.is_empty()
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
    {
        return Ok(None);
    }
    let age = s.parse::<f64>()?;
    Ok(if age.is_nan() { None } else { Some(age) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_date() {
        let date = parse_event_date("2015-01-02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 1, 2).unwrap());
    }

    #[test]
    fn parses_date_with_time() {
        let date = parse_event_date("2020-02-29 13:45:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        let date = parse_event_date("2020-02-29T13:45:00.000").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let date = parse_event_date("2019-12-31T23:00:00+00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
    }

    #[test]
    fn rejects_invalid_date() {
        assert!(parse_event_date("not-a-date").is_none());
        assert!(parse_event_date("2019-02-30").is_none());
    }

    #[test]
    fn parses_ages() {
        assert_eq!(parse_age("53").unwrap(), Some(53.0));
        assert_eq!(parse_age(" 23.5 ").unwrap(), Some(23.5));
        assert_eq!(parse_age("").unwrap(), None);
        assert_eq!(parse_age("NaN").unwrap(), None);
        assert!(parse_age("old").is_err());
    }
}
