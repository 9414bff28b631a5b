//! Pure calendar math used by the budget model.
//!
//! Nothing here knows about "now" except [`resolve_local_date`], which is the
//! single place where an instant is turned into a local calendar date. Every
//! other function works on dates that are already local.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Budget classification of a single calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Weekday,
    Weekend,
}

/// Saturday and Sunday are weekend days, everything else is a weekday.
pub fn classify_day(date: NaiveDate) -> DayKind {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayKind::Weekend,
        _ => DayKind::Weekday,
    }
}

/// A calendar month, the key of the monthly bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidMonth(format!("year {year} out of range")));
        }
        Ok(Self { year, month })
    }

    /// Parses raw year/month inputs (as received from a query string).
    pub fn parse(year: &str, month: &str) -> ResultEngine<Self> {
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidMonth(format!("\"{year}\" is not a valid year")))?;
        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidMonth(format!("\"{month}\" is not a valid month")))?;
        Self::new(year, month)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Storage key of the monthly bucket (`YYYY-MM`).
    pub fn key(self) -> String {
        self.to_string()
    }

    fn first_day(self) -> NaiveDate {
        // Both fields were validated on construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Number of days in the month, leap years included.
    pub fn days(self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
            Some(next) => next.signed_duration_since(self.first_day()).num_days() as u32,
            None => 31,
        }
    }

    /// Every calendar day of the month, in order.
    pub fn iter_days(self) -> impl Iterator<Item = NaiveDate> {
        self.first_day().iter_days().take(self.days() as usize)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Weekday/weekend split of a month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthDayCounts {
    pub weekdays: u32,
    pub weekends: u32,
}

pub fn count_weekdays_and_weekends(month: YearMonth) -> MonthDayCounts {
    month.iter_days().fold(
        MonthDayCounts {
            weekdays: 0,
            weekends: 0,
        },
        |mut counts, day| {
            match classify_day(day) {
                DayKind::Weekday => counts.weekdays += 1,
                DayKind::Weekend => counts.weekends += 1,
            }
            counts
        },
    )
}

/// Storage key of the daily bucket (`YYYY-MM-DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// Alternate layouts (`2025-3-5`, `2025/03/05`) and offset or time suffixes
/// are rejected.
pub fn parse_date(raw: &str) -> ResultEngine<NaiveDate> {
    let invalid = || EngineError::InvalidDate(format!("\"{raw}\" is not a YYYY-MM-DD date"));

    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

/// Converts an instant into the local calendar date of `timezone`.
pub fn resolve_local_date(now: DateTime<Utc>, timezone: &str) -> ResultEngine<NaiveDate> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| EngineError::ClockResolution(format!("unknown timezone \"{timezone}\"")))?;
    Ok(now.with_timezone(&tz).date_naive())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekends_are_saturday_and_sunday() {
        assert_eq!(classify_day(date(2025, 3, 15)), DayKind::Weekend);
        assert_eq!(classify_day(date(2025, 3, 16)), DayKind::Weekend);
        assert_eq!(classify_day(date(2025, 3, 17)), DayKind::Weekday);
        assert_eq!(classify_day(date(2024, 2, 29)), DayKind::Weekday);
    }

    #[test]
    fn classification_matches_weekday_for_a_leap_year() {
        let year = YearMonth::new(2024, 1).unwrap().first_day();
        for day in year.iter_days().take(366) {
            let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
            assert_eq!(classify_day(day) == DayKind::Weekend, weekend, "{day}");
        }
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days(), 29);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days(), 28);
        assert_eq!(YearMonth::new(1900, 2).unwrap().days(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().days(), 29);
        assert_eq!(YearMonth::new(2025, 4).unwrap().days(), 30);
        assert_eq!(YearMonth::new(2025, 12).unwrap().days(), 31);
    }

    #[test]
    fn counts_cover_every_day() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                let ym = YearMonth::new(year, month).unwrap();
                let counts = count_weekdays_and_weekends(ym);
                assert_eq!(counts.weekdays + counts.weekends, ym.days(), "{ym}");
            }
        }
    }

    #[test]
    fn march_2025_split() {
        let counts = count_weekdays_and_weekends(YearMonth::new(2025, 3).unwrap());
        assert_eq!(
            counts,
            MonthDayCounts {
                weekdays: 21,
                weekends: 10
            }
        );
    }

    #[test]
    fn month_validation() {
        assert!(matches!(
            YearMonth::new(2025, 0),
            Err(EngineError::InvalidMonth(_))
        ));
        assert!(matches!(
            YearMonth::new(2025, 13),
            Err(EngineError::InvalidMonth(_))
        ));
        assert!(matches!(
            YearMonth::parse("2025", "abc"),
            Err(EngineError::InvalidMonth(_))
        ));
        assert!(matches!(
            YearMonth::parse("NaN", "3"),
            Err(EngineError::InvalidMonth(_))
        ));
        assert_eq!(YearMonth::parse("2025", "3").unwrap().key(), "2025-03");
    }

    #[test]
    fn strict_date_parsing() {
        assert_eq!(parse_date("2025-03-15").unwrap(), date(2025, 3, 15));
        for raw in [
            "2025-3-15",
            "2025/03/15",
            "15-03-2025",
            "2025-03-15T00:00:00",
            "2025-03-15+08:00",
            "2025-02-30",
            "",
        ] {
            assert!(
                matches!(parse_date(raw), Err(EngineError::InvalidDate(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn local_date_uses_the_timezone_calendar() {
        // 2025-03-14 17:30 UTC is already Saturday in Singapore (UTC+8).
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 17, 30, 0).unwrap();
        assert_eq!(
            resolve_local_date(now, "Asia/Singapore").unwrap(),
            date(2025, 3, 15)
        );
        assert_eq!(resolve_local_date(now, "UTC").unwrap(), date(2025, 3, 14));
    }

    #[test]
    fn unknown_timezone_is_a_clock_error() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert!(matches!(
            resolve_local_date(now, "Mars/Olympus"),
            Err(EngineError::ClockResolution(_))
        ));
    }
}
