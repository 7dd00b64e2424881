//! Field-level conversion of textual CSV values.
//!
//! Every parser returns `Ok(None)` for blank input and a [`FormatError`] when
//! a non-blank value does not convert. Nothing here knows which file a value
//! came from; ingestion attaches that.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::{
    error::FormatError,
    schema::{FieldKind, FileDatePattern},
    text,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S%.3f").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

fn gps_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1980, 1, 6).and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_integer(value: &str) -> Result<Option<i64>, FormatError> {
    if text::is_blank(value) {
        return Ok(None);
    }
    value
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|err| FormatError::with_cause(format!("Cannot parse '{value}' as integer"), err))
}

pub fn parse_float(value: &str) -> Result<Option<f64>, FormatError> {
    if text::is_blank(value) {
        return Ok(None);
    }
    value
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|err| FormatError::with_cause(format!("Cannot parse '{value}' as float"), err))
}

pub fn parse_date(value: &str, format: &str) -> Result<Option<NaiveDate>, FormatError> {
    if text::is_blank(value) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value.trim(), format)
        .map(Some)
        .map_err(|err| {
            FormatError::with_cause(
                format!("Incorrect date format: '{value}' does not match '{format}'"),
                err,
            )
        })
}

pub fn parse_time(value: &str, format: &str) -> Result<Option<NaiveTime>, FormatError> {
    if text::is_blank(value) {
        return Ok(None);
    }
    NaiveTime::parse_from_str(value.trim(), format)
        .map(Some)
        .map_err(|err| {
            FormatError::with_cause(
                format!("Incorrect time format: '{value}' does not match '{format}'"),
                err,
            )
        })
}

pub fn parse_datetime(value: &str, format: &str) -> Result<Option<NaiveDateTime>, FormatError> {
    if text::is_blank(value) {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value.trim(), format)
        .map(Some)
        .map_err(|err| {
            FormatError::with_cause(
                format!("Incorrect date/time format: '{value}' does not match '{format}'"),
                err,
            )
        })
}

/// Parses `"<week> <seconds>"` GPS time. Seconds are truncated to whole
/// milliseconds.
pub fn parse_gps_datetime(value: &str) -> Result<Option<NaiveDateTime>, FormatError> {
    if text::is_blank(value) {
        return Ok(None);
    }
    let mut tokens = value.split_whitespace();
    let (Some(week), Some(seconds)) = (tokens.next(), tokens.next()) else {
        return Err(FormatError::new(format!(
            "Incorrect GPS time '{value}': expected '<week> <seconds>'"
        )));
    };
    let week = week.parse::<i64>().map_err(|err| {
        FormatError::with_cause(format!("Incorrect GPS week in '{value}'"), err)
    })?;
    let seconds = seconds.parse::<f64>().map_err(|err| {
        FormatError::with_cause(format!("Incorrect GPS seconds in '{value}'"), err)
    })?;
    let millis = (seconds * 1000.0) as i64;
    week.checked_mul(7)
        .and_then(TimeDelta::try_days)
        .zip(TimeDelta::try_milliseconds(millis))
        .and_then(|(days, offset)| {
            gps_epoch()?
                .checked_add_signed(days)?
                .checked_add_signed(offset)
        })
        .map(Some)
        .ok_or_else(|| FormatError::new(format!("GPS time '{value}' is out of range")))
}

pub fn parse_epoch_millis(value: &str) -> Result<Option<NaiveDateTime>, FormatError> {
    let Some(millis) = parse_integer(value)? else {
        return Ok(None);
    };
    DateTime::from_timestamp_millis(millis)
        .map(|dt| Some(dt.naive_utc()))
        .ok_or_else(|| FormatError::new(format!("Timestamp '{value}' is out of range")))
}

/// Converts `value` according to `kind`.
pub fn parse_value(value: &str, kind: &FieldKind) -> Result<Option<Value>, FormatError> {
    let parsed = match kind {
        FieldKind::Text => {
            if value.is_empty() {
                None
            } else {
                Some(Value::Text(value.to_string()))
            }
        }
        FieldKind::Integer => parse_integer(value)?.map(Value::Integer),
        FieldKind::Float => parse_float(value)?.map(Value::Float),
        FieldKind::Date { format } => parse_date(value, format)?.map(Value::Date),
        FieldKind::Time { format } => parse_time(value, format)?.map(Value::Time),
        FieldKind::DateTime { format } => parse_datetime(value, format)?.map(Value::DateTime),
        FieldKind::GpsTime => parse_gps_datetime(value)?.map(Value::DateTime),
        FieldKind::EpochMillis => parse_epoch_millis(value)?.map(Value::DateTime),
    };
    Ok(parsed)
}

/// Recovers the logging date embedded in a file name.
pub fn date_from_file_name(
    file_name: &str,
    pattern: &FileDatePattern,
) -> Result<NaiveDate, FormatError> {
    let regex = pattern.regex().map_err(|err| {
        FormatError::with_cause(
            format!("Invalid file date pattern '{}'", pattern.pattern),
            err,
        )
    })?;
    let matched = text::match_pattern(file_name, &regex)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| FormatError::new("Incorrect file name. Cannot match date pattern"))?;
    pattern
        .formats
        .iter()
        .filter(|format| !text::is_blank(format))
        .find_map(|format| NaiveDate::parse_from_str(matched, format).ok())
        .ok_or_else(|| FormatError::new("Incorrect date formats"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, min, s, ms)
            .unwrap()
    }

    #[test]
    fn blank_values_convert_to_none() {
        assert_eq!(parse_float("  ").unwrap(), None);
        assert_eq!(parse_date("", "%Y-%m-%d").unwrap(), None);
        assert_eq!(parse_gps_datetime(" ").unwrap(), None);
        assert_eq!(parse_value("", &FieldKind::Text).unwrap(), None);
    }

    #[test]
    fn date_failures_chain_the_chrono_cause() {
        let err = parse_date("2024/05/01", "%Y-%m-%d").expect_err("wrong separators");
        assert!(err.message().starts_with("Incorrect date format"));
        assert!(
            err.cause()
                .and_then(|c| c.downcast_ref::<chrono::ParseError>())
                .is_some()
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn datetime_with_fractional_seconds() {
        let parsed = parse_datetime("2024-05-01 10:15:30.250", "%Y-%m-%d %H:%M:%S%.3f")
            .unwrap()
            .unwrap();
        assert_eq!(parsed, datetime(2024, 5, 1, 10, 15, 30, 250));
    }

    #[test]
    fn gps_time_counts_weeks_from_gps_epoch() {
        let parsed = parse_gps_datetime("2000 3600.5").unwrap().unwrap();
        // 2000 weeks after 1980-01-06 is 2018-05-06.
        assert_eq!(parsed, datetime(2018, 5, 6, 1, 0, 0, 500));
    }

    #[test]
    fn gps_time_rejects_malformed_values() {
        let err = parse_gps_datetime("2000").expect_err("single token");
        assert!(err.cause().is_none());
        let err = parse_gps_datetime("week 10.0").expect_err("non-numeric week");
        assert!(
            err.cause()
                .and_then(|c| c.downcast_ref::<std::num::ParseIntError>())
                .is_some()
        );
    }

    #[test]
    fn epoch_millis_is_utc() {
        let parsed = parse_epoch_millis("1714558530250").unwrap().unwrap();
        assert_eq!(parsed, datetime(2024, 5, 1, 10, 15, 30, 250));
    }

    #[test]
    fn parse_value_dispatches_on_kind() {
        assert_eq!(
            parse_value(" 42 ", &FieldKind::Integer).unwrap(),
            Some(Value::Integer(42))
        );
        assert_eq!(
            parse_value("51.5", &FieldKind::Float).unwrap(),
            Some(Value::Float(51.5))
        );
        let err = parse_value("north", &FieldKind::Float).expect_err("not a number");
        assert_eq!(err.message(), "Cannot parse 'north' as float");
    }

    #[test]
    fn date_from_file_name_uses_first_matching_format() {
        let pattern = FileDatePattern {
            pattern: r"(\d{4}[-_]\d{2}[-_]\d{2})".to_string(),
            formats: vec![String::new(), "%Y-%m-%d".to_string(), "%Y_%m_%d".to_string()],
        };
        assert_eq!(
            date_from_file_name("flight_2024_05_01.csv", &pattern).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );

        let err = date_from_file_name("flight.csv", &pattern).expect_err("no date");
        assert_eq!(err.message(), "Incorrect file name. Cannot match date pattern");

        let err = date_from_file_name("flight_2024-13-45.csv", &pattern).expect_err("bad date");
        assert_eq!(err.message(), "Incorrect date formats");
    }
}
