//! `Date` type.
//!
//! A thin wrapper around [`chrono::NaiveDate`] that adds the input formats
//! accepted at the query boundary and the weekday conventions used by the
//! classifier.
//!
//! # Accepted input forms
//! * `2026-02-25`, `2026-2-25`
//! * `2026_02_25`, `2026_2_25`
//! * `20260225`
//! * `2026年02月25日`, `2026年2月25日`

use chrono::{Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use wd_core::errors::{Error, Result};
use wd_core::fail;

use crate::weekday::Weekday;

/// A calendar date without time zone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12), and day-of-month (1–31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| Error::Precondition(format!("no such date {year}-{month:02}-{day:02}")))
    }

    /// Parse user input in any of the accepted forms.
    ///
    /// Input that does not match a known form, or names a day that does not
    /// exist (`2026-02-30`), fails with [`Error::InvalidDateFormat`] carrying
    /// the original input.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidDateFormat {
            input: input.to_string(),
        };
        let (y, m, d) = parse_date_parts(input).ok_or_else(invalid)?;
        NaiveDate::from_ymd_opt(y, m, d).map(Date).ok_or_else(invalid)
    }

    /// Today's date as observed in `tz`.
    pub fn today_in<Tz: TimeZone>(tz: &Tz) -> Self {
        Date(Utc::now().with_timezone(tz).date_naive())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Return the underlying `chrono` date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Return the year.
    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.0)
    }

    /// Return the month (1–12).
    pub fn month(&self) -> u32 {
        chrono::Datelike::month(&self.0)
    }

    /// Return the weekday.
    pub fn weekday(&self) -> Weekday {
        chrono::Datelike::weekday(&self.0).into()
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Advance by `n` days (negative goes backwards).
    pub fn add_days(self, n: i64) -> Result<Self> {
        let shifted = if n >= 0 {
            self.0.checked_add_days(Days::new(n.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(n.unsigned_abs()))
        };
        match shifted {
            Some(date) => Ok(Date(date)),
            None => fail!("{self} + {n} days is out of range"),
        }
    }

    /// The following day.
    pub fn succ(self) -> Result<Self> {
        self.add_days(1)
    }

    /// Return the number of calendar days from `self` to `other`.
    /// Positive if `other > self`.
    pub fn days_between(self, other: Date) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

impl From<Date> for NaiveDate {
    fn from(d: Date) -> Self {
        d.0
    }
}

impl std::str::FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Date::parse(s)
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i64;
    fn sub(self, rhs: Date) -> i64 {
        rhs.days_between(self)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({})", self.0.format("%Y-%m-%d"))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Split an input string into numeric (year, month, day) parts.
///
/// Only the shape is checked here; whether the day exists is left to
/// `chrono`.
fn parse_date_parts(s: &str) -> Option<(i32, u32, u32)> {
    let s = s.trim();
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return Some((s[..4].parse().ok()?, s[4..6].parse().ok()?, s[6..].parse().ok()?));
    }

    let parts: Vec<&str> = if let Some(rest) = s.strip_suffix('日') {
        rest.split(|c| c == '年' || c == '月').collect()
    } else if s.contains('_') {
        s.split('_').collect()
    } else {
        s.split('-').collect()
    };
    let [y, m, d] = parts.as_slice() else {
        return None;
    };
    if y.len() != 4 || !(1..=2).contains(&m.len()) || !(1..=2).contains(&d.len()) {
        return None;
    }
    if ![y, m, d].iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    Some((y.parse().ok()?, m.parse().ok()?, d.parse().ok()?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_accepted_forms() {
        let expected = date(2026, 2, 25);
        for input in [
            "2026-02-25",
            "2026-2-25",
            "2026_02_25",
            "2026_2_25",
            "20260225",
            "2026年02月25日",
            "2026年2月25日",
            "  2026-02-25 ",
        ] {
            assert_eq!(Date::parse(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_rejected_forms_echo_input() {
        for input in [
            "",
            "tomorrow",
            "2026/02/25",
            "26-02-25",
            "2026-02",
            "2026-02-25-01",
            "2026-002-25",
            "2026_02-25",
            "2026年02月25",
            "+2026-02-25",
        ] {
            assert_eq!(
                Date::parse(input),
                Err(Error::InvalidDateFormat {
                    input: input.to_string()
                }),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_nonexistent_day_is_format_error() {
        assert!(matches!(
            Date::parse("2026-02-30"),
            Err(Error::InvalidDateFormat { .. })
        ));
        assert!(matches!(
            Date::parse("20261301"),
            Err(Error::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_weekday() {
        // 2026-01-01 is a Thursday
        assert_eq!(date(2026, 1, 1).weekday(), Weekday::Thursday);
        // 2026-02-28 is a Saturday
        assert_eq!(date(2026, 2, 28).weekday(), Weekday::Saturday);
    }

    #[test]
    fn test_arithmetic() {
        let d = date(2026, 2, 25);
        assert_eq!(d.add_days(4).unwrap(), date(2026, 3, 1));
        assert_eq!(d.add_days(-25).unwrap(), date(2026, 1, 31));
        assert_eq!(date(2026, 12, 31).succ().unwrap(), date(2027, 1, 1));
        assert_eq!(d.days_between(date(2026, 2, 28)), 3);
        assert_eq!(date(2026, 2, 28) - d, 3);
        assert!(matches!(Date::from(NaiveDate::MAX).succ(), Err(Error::Runtime(_))));
    }

    #[test]
    fn test_display_is_iso() {
        let d = date(2026, 1, 4);
        assert_eq!(d.to_string(), "2026-01-04");
        assert_eq!(format!("{d:?}"), "Date(2026-01-04)");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2026-01-04\"");
    }
}
