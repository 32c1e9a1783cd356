//! ISO-8601 week labels (`2024-W43`) used as report keys.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, Utc};

/// Label of the ISO week containing `date` shifted by `offset_weeks`.
///
/// The year is the ISO week-numbering year, which differs from the calendar
/// year for the first and last few days of some years.
pub fn week_string(date: NaiveDate, offset_weeks: i64) -> Option<String> {
    let shifted = date.checked_add_signed(TimeDelta::try_weeks(offset_weeks)?)?;
    let week = shifted.iso_week();
    Some(format!("{}-W{:02}", week.year(), week.week()))
}

/// Label of the current week as seen from `tz`, shifted by `offset_weeks`.
pub fn current_week_string(
    now: DateTime<Utc>,
    tz: FixedOffset,
    offset_weeks: i64,
) -> Option<String> {
    week_string(now.with_timezone(&tz).date_naive(), offset_weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mid_year() {
        assert_eq!(week_string(date(2024, 10, 23), 0).as_deref(), Some("2024-W43"));
    }

    #[test]
    fn year_boundaries_use_iso_year() {
        assert_eq!(week_string(date(2021, 1, 3), 0).as_deref(), Some("2020-W53"));
        assert_eq!(week_string(date(2020, 12, 31), 0).as_deref(), Some("2020-W53"));
        assert_eq!(week_string(date(2024, 12, 30), 0).as_deref(), Some("2025-W01"));
    }

    #[test]
    fn offsets_shift_whole_weeks() {
        assert_eq!(week_string(date(2024, 10, 23), -1).as_deref(), Some("2024-W42"));
        assert_eq!(week_string(date(2024, 12, 23), 1).as_deref(), Some("2025-W01"));
    }

    #[test]
    fn overflow_is_none() {
        assert_eq!(week_string(NaiveDate::MAX, 1), None);
        assert_eq!(week_string(date(2024, 1, 1), i64::MAX), None);
    }

    #[test]
    fn timezone_moves_the_date() {
        // Sunday 2024-10-27 20:00 UTC is already Monday in UTC+9.
        let now = Utc.with_ymd_and_hms(2024, 10, 27, 20, 0, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(current_week_string(now, utc, 0).as_deref(), Some("2024-W43"));
        assert_eq!(current_week_string(now, tokyo, 0).as_deref(), Some("2024-W44"));
    }
}
