//! `Calendar` trait.
//!
//! A calendar knows how to classify dates and, from that, which dates are
//! workdays.  [`CalendarDataset`] is the plain implementation;
//! [`ActiveCalendar`](crate::snapshot::ActiveCalendar) answers each call from
//! whichever snapshot is installed at the time.

use wd_core::errors::Result;

use crate::classify::{classify, DayClassification};
use crate::dataset::CalendarDataset;
use crate::date::Date;
use crate::rest_day::{find_next_rest_day, RestDayInfo};

/// A workday calendar for one jurisdiction.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Jurisdiction code (e.g. `"CN"`).
    fn name(&self) -> &str;

    /// Classify `date`.
    fn classify(&self, date: Date) -> Result<DayClassification>;

    /// Earliest rest day strictly after `date`.
    fn next_rest_day(&self, date: Date) -> Result<RestDayInfo>;

    /// Return `true` if `date` is a workday.
    fn is_workday(&self, date: Date) -> Result<bool> {
        Ok(self.classify(date)?.is_workday())
    }

    /// Return `true` if `date` is a rest day of any kind.
    fn is_rest_day(&self, date: Date) -> Result<bool> {
        Ok(!self.is_workday(date)?)
    }

    /// Count the workdays between `d1` (exclusive) and `d2` (inclusive).
    /// Returns a negative number if `d2 < d1`.
    fn workdays_between(&self, d1: Date, d2: Date) -> Result<i64> {
        if d1 == d2 {
            return Ok(0);
        }
        let sign = if d2 > d1 { 1 } else { -1 };
        let (start, end) = if d2 > d1 { (d1, d2) } else { (d2, d1) };
        let mut count = 0;
        let mut d = start.succ()?;
        while d <= end {
            if self.is_workday(d)? {
                count += 1;
            }
            d = d.succ()?;
        }
        Ok(sign * count)
    }
}

impl Calendar for CalendarDataset {
    fn name(&self) -> &str {
        self.jurisdiction()
    }

    fn classify(&self, date: Date) -> Result<DayClassification> {
        classify(date, self)
    }

    fn next_rest_day(&self, date: Date) -> Result<RestDayInfo> {
        find_next_rest_day(date, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetBuilder;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn may_2026() -> CalendarDataset {
        let mut b = DatasetBuilder::new("CN", 2026, 2026);
        b.add_holiday_span(date(2026, 5, 1), 5, "劳动节").unwrap();
        b.add_makeup_workday(date(2026, 5, 9));
        b.build().unwrap()
    }

    #[test]
    fn rest_day_flags() {
        let cal = may_2026();
        assert_eq!(cal.name(), "CN");
        assert!(cal.is_rest_day(date(2026, 5, 4)).unwrap());
        assert!(cal.is_workday(date(2026, 5, 9)).unwrap());
    }

    #[test]
    fn workdays_between() {
        let cal = may_2026();
        // Thu 2026-04-30 (exclusive) to Sun 2026-05-10 (inclusive):
        // 1–5 holiday, 6–8 work, 9 makeup, 10 Sunday
        assert_eq!(
            cal.workdays_between(date(2026, 4, 30), date(2026, 5, 10)).unwrap(),
            4
        );
        assert_eq!(
            cal.workdays_between(date(2026, 5, 10), date(2026, 4, 30)).unwrap(),
            -4
        );
        assert_eq!(cal.workdays_between(date(2026, 5, 6), date(2026, 5, 6)).unwrap(), 0);
    }
}
