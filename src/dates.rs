//! Calendar helpers shared by the range fetcher, aggregator and CLI.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Returns the UTC calendar date of an instant.
pub fn utc_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Parses a `YYYY-MM-DD` string.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Shifts `date` by `n` days. `n` may be negative or zero.
pub fn add_days(date: NaiveDate, n: i64) -> Result<NaiveDate> {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| Error::DateOutOfRange(format!("{date} + {n} days")))
}

/// Shifts `date` forward by `n` months, clamping the day to the end of the target month.
pub fn add_months(date: NaiveDate, n: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(n))
        .ok_or_else(|| Error::DateOutOfRange(format!("{date} + {n} months")))
}

/// Same calendar day `years` years earlier (Feb 29 clamps to Feb 28).
pub fn years_before(date: NaiveDate, years: u32) -> Result<NaiveDate> {
    years
        .checked_mul(12)
        .and_then(|months| date.checked_sub_months(Months::new(months)))
        .ok_or_else(|| Error::DateOutOfRange(format!("{date} - {years} years")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_format_date_pads_fields() {
        assert_eq!(format_date(d(2024, 3, 7)), "2024-03-07");
    }

    #[test]
    fn test_utc_date_uses_utc_calendar_day() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(utc_date(ts), d(2024, 12, 31));
    }

    #[test]
    fn test_parse_date_round_trips_with_format() {
        assert_eq!(parse_date("2023-01-15").unwrap(), d(2023, 1, 15));
        assert_eq!(parse_date(" 2023-01-15 ").unwrap(), d(2023, 1, 15));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("15/01/2023").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { ref input } if input == "15/01/2023"));
        assert!(parse_date("2023-02-30").is_err());
    }

    #[test]
    fn test_add_days_handles_sign() {
        assert_eq!(add_days(d(2024, 2, 28), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(add_days(d(2024, 3, 1), -1).unwrap(), d(2024, 2, 29));
        assert_eq!(add_days(d(2024, 3, 1), 0).unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn test_add_days_overflow_is_error() {
        assert!(matches!(
            add_days(NaiveDate::MAX, 1),
            Err(Error::DateOutOfRange(_))
        ));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2023, 1, 31), 1).unwrap(), d(2023, 2, 28));
        assert_eq!(add_months(d(2022, 8, 31), 18).unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn test_years_before_clamps_leap_day() {
        assert_eq!(years_before(d(2024, 2, 29), 1).unwrap(), d(2023, 2, 28));
        assert_eq!(years_before(d(2026, 10, 18), 4).unwrap(), d(2022, 10, 18));
    }
}
