//! Calendar math: week boundaries, year validation, date-range parsing.
//!
//! Weeks always start on Monday. The first scheduled week starts on the
//! first Monday on or after January 1; days of the year before it are
//! never scheduled.

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    error::{ScheduleError, ScheduleResult},
    types::Year,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator accepted between the two ends of a date range.
pub const RANGE_SEPARATOR: &str = "to";

/// January 1 of `year`, or InvalidYear if chrono cannot represent it.
pub fn year_start(year: Year) -> ScheduleResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| ScheduleError::InvalidYear {
        input: year.to_string(),
    })
}

/// First Monday on or after January 1.
pub fn first_monday(year: Year) -> ScheduleResult<NaiveDate> {
    let jan1 = year_start(year)?;
    let offset = (7 - jan1.weekday().num_days_from_monday()) % 7;
    Ok(jan1 + Duration::days(offset as i64))
}

/// Monday of each of the first `weeks` scheduled weeks.
pub fn week_starts(year: Year, weeks: u32) -> ScheduleResult<Vec<NaiveDate>> {
    let start = first_monday(year)?;
    Ok((0..weeks as i64).map(|w| start + Duration::weeks(w)).collect())
}

/// The days of the week beginning `week_start` that fall inside `year`.
pub fn days_of_week_in_year(week_start: NaiveDate, year: Year) -> impl Iterator<Item = NaiveDate> {
    (0..7)
        .map(move |d| week_start + Duration::days(d))
        .filter(move |d| d.year() == year)
}

/// Every date from `start` to `end` inclusive. Empty when start > end.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

pub fn current_year() -> Year {
    chrono::Local::now().year()
}

/// Parse a user-entered year. Only plain digits are accepted.
/// Unless `allow_past`, the year must not precede `current`.
pub fn parse_year(input: &str, current: Year, allow_past: bool) -> ScheduleResult<Year> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScheduleError::InvalidYear { input: input.to_string() });
    }
    let year: Year = trimmed
        .parse()
        .map_err(|_| ScheduleError::InvalidYear { input: input.to_string() })?;
    year_start(year)?;
    if !allow_past && year < current {
        return Err(ScheduleError::YearInPast { year, current });
    }
    Ok(year)
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD to YYYY-MM-DD` into an inclusive range.
pub fn parse_date_range(input: &str) -> ScheduleResult<(NaiveDate, NaiveDate)> {
    let invalid = || ScheduleError::InvalidDate { input: input.to_string() };
    let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| invalid());

    match input.split_once(RANGE_SEPARATOR) {
        Some((start, end)) => Ok((parse(start)?, parse(end)?)),
        None => {
            let date = parse(input)?;
            Ok((date, date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn first_monday_on_or_after_jan_1() {
        // 2024-01-01 is a Monday.
        assert_eq!(first_monday(2024).unwrap(), d(2024, 1, 1));
        // 2025-01-01 is a Wednesday.
        assert_eq!(first_monday(2025).unwrap(), d(2025, 1, 6));
        // 2023-01-01 is a Sunday.
        assert_eq!(first_monday(2023).unwrap(), d(2023, 1, 2));
    }

    #[test]
    fn week_starts_are_seven_days_apart() {
        let weeks = week_starts(2025, 52).unwrap();
        assert_eq!(weeks.len(), 52);
        assert_eq!(weeks[51], d(2025, 12, 29));
        for pair in weeks.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
    }

    #[test]
    fn last_week_is_clipped_to_the_year() {
        let days: Vec<_> = days_of_week_in_year(d(2025, 12, 29), 2025).collect();
        assert_eq!(days, vec![d(2025, 12, 29), d(2025, 12, 30), d(2025, 12, 31)]);
    }

    #[test]
    fn parse_year_rejects_garbage_and_past() {
        assert!(matches!(parse_year("20x5", 2025, false), Err(ScheduleError::InvalidYear { .. })));
        assert!(matches!(parse_year("-2025", 2025, false), Err(ScheduleError::InvalidYear { .. })));
        assert!(matches!(
            parse_year("2024", 2025, false),
            Err(ScheduleError::YearInPast { year: 2024, current: 2025 })
        ));
        assert_eq!(parse_year(" 2024 ", 2025, true).unwrap(), 2024);
        assert_eq!(parse_year("2026", 2025, false).unwrap(), 2026);
    }

    #[test]
    fn parse_single_date_and_range() {
        assert_eq!(parse_date_range("2025-03-04").unwrap(), (d(2025, 3, 4), d(2025, 3, 4)));
        assert_eq!(
            parse_date_range("2025-03-04 to 2025-03-10").unwrap(),
            (d(2025, 3, 4), d(2025, 3, 10))
        );
        assert!(matches!(parse_date_range("03/04/2025"), Err(ScheduleError::InvalidDate { .. })));
        assert!(matches!(parse_date_range("2025-02-30"), Err(ScheduleError::InvalidDate { .. })));
    }

    #[test]
    fn dates_between_is_inclusive_and_empty_when_reversed() {
        assert_eq!(dates_between(d(2025, 1, 30), d(2025, 2, 2)).count(), 4);
        assert_eq!(dates_between(d(2025, 2, 2), d(2025, 1, 30)).count(), 0);
    }
}
