//! Localized long-date parsing for the requested pick-up day
//!
//! Accepts `20 Oktober 2026`, `Selasa, 20 Oktober 2026` and the English
//! equivalents (`Tuesday, 20 October 2026`). Month names are matched
//! case-insensitively; three-letter abbreviations are accepted too.
//! The result is local midnight in the business timezone, as Unix millis.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickupDateError {
    #[error("pick-up date is empty")]
    Empty,

    #[error("pick-up date must look like '20 Oktober 2026': {0}")]
    Malformed(String),

    #[error("unknown month name: {0}")]
    UnknownMonth(String),

    #[error("no such calendar day: {0}")]
    InvalidDay(String),
}

const MONTHS: [(&str, u32); 24] = [
    ("januari", 1),
    ("februari", 2),
    ("maret", 3),
    ("april", 4),
    ("mei", 5),
    ("juni", 6),
    ("juli", 7),
    ("agustus", 8),
    ("september", 9),
    ("oktober", 10),
    ("november", 11),
    ("desember", 12),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const ABBREVIATIONS: [(&str, u32); 5] = [
    ("agt", 8),
    ("ags", 8),
    ("okt", 10),
    ("des", 12),
    ("sept", 9),
];

fn month_number(name: &str) -> Option<u32> {
    let name = name.trim_end_matches('.').to_lowercase();
    if let Some((_, n)) = MONTHS.iter().find(|(m, _)| *m == name) {
        return Some(*n);
    }
    if let Some((_, n)) = ABBREVIATIONS.iter().find(|(m, _)| *m == name) {
        return Some(*n);
    }
    if name.chars().count() == 3 {
        return MONTHS
            .iter()
            .find(|(m, _)| m.starts_with(name.as_str()))
            .map(|(_, n)| *n);
    }
    None
}

/// Parse the calendar day without attaching a timezone
pub fn parse_calendar_day(input: &str) -> Result<NaiveDate, PickupDateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PickupDateError::Empty);
    }

    // Drop an optional weekday prefix ("Selasa, ")
    let body = match trimmed.rsplit_once(',') {
        Some((_, rest)) => rest.trim(),
        None => trimmed,
    };

    let parts: Vec<&str> = body.split_whitespace().collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(PickupDateError::Malformed(input.to_string()));
    };

    let day: u32 = day
        .parse()
        .map_err(|_| PickupDateError::Malformed(input.to_string()))?;
    let month = month_number(month).ok_or_else(|| PickupDateError::UnknownMonth(month.to_string()))?;
    if year.len() != 4 {
        return Err(PickupDateError::Malformed(input.to_string()));
    }
    let year: i32 = year
        .parse()
        .map_err(|_| PickupDateError::Malformed(input.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| PickupDateError::InvalidDay(input.to_string()))
}

/// Parse and normalize to local midnight, Unix millis
pub fn parse_pickup_date(input: &str, tz: Tz) -> Result<i64, PickupDateError> {
    let day = parse_calendar_day(input)?;
    let midnight = day.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| PickupDateError::InvalidDay(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indonesian_long_date() {
        assert_eq!(
            parse_calendar_day("20 Oktober 2026"),
            Ok(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
        );
    }

    #[test]
    fn test_weekday_prefix_and_case() {
        assert_eq!(
            parse_calendar_day("Selasa, 20 oktober 2026"),
            Ok(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
        );
        assert_eq!(
            parse_calendar_day("Tuesday, 20 OCTOBER 2026"),
            Ok(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
        );
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(
            parse_calendar_day("1 Agt 2026"),
            Ok(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
        assert_eq!(
            parse_calendar_day("5 Mar 2027"),
            Ok(NaiveDate::from_ymd_opt(2027, 3, 5).unwrap())
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(parse_calendar_day("  "), Err(PickupDateError::Empty));
        assert!(matches!(
            parse_calendar_day("2026-10-20"),
            Err(PickupDateError::Malformed(_))
        ));
        assert!(matches!(
            parse_calendar_day("20 Brumaire 2026"),
            Err(PickupDateError::UnknownMonth(_))
        ));
        assert!(matches!(
            parse_calendar_day("31 Februari 2026"),
            Err(PickupDateError::InvalidDay(_))
        ));
        assert!(matches!(
            parse_calendar_day("20 Oktober 26"),
            Err(PickupDateError::Malformed(_))
        ));
    }

    #[test]
    fn test_normalized_to_local_midnight() {
        let millis = parse_pickup_date("20 Oktober 2026", chrono_tz::Asia::Jakarta).unwrap();
        // 2026-10-20T00:00:00+07:00
        assert_eq!(millis, 1_792_429_200_000);
    }
}
