//! Forward search for the next rest day.

use serde::Serialize;
use wd_core::errors::{Error, Result};

use crate::classify::classify;
use crate::dataset::CalendarDataset;
use crate::date::Date;
use crate::weekday::Weekday;

/// Maximum number of days inspected after the start date.
///
/// A real jurisdiction never goes a whole year without a rest day, so running
/// past this bound means the dataset is broken.
pub const MAX_LOOKAHEAD_DAYS: u32 = 370;

/// The next non-workday after a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestDayInfo {
    /// The rest day.
    pub date: Date,
    /// Its weekday.
    pub weekday: Weekday,
    /// Its weekday as printed on mainland calendars (`周六`).
    pub weekday_cn: &'static str,
    /// Holiday name or `"weekend"`.
    pub detail: String,
    /// Calendar days from the start date to `date` (always at least 1).
    pub days_from_now: u32,
}

/// Find the earliest rest day strictly after `start`.
///
/// # Errors
/// * [`Error::UnsupportedDateRange`] if the scan leaves the dataset's years
///   before finding a rest day.
/// * [`Error::RestDaySearchExceeded`] if no rest day appears within
///   [`MAX_LOOKAHEAD_DAYS`].
pub fn find_next_rest_day(start: Date, dataset: &CalendarDataset) -> Result<RestDayInfo> {
    find_next_rest_day_within(start, dataset, MAX_LOOKAHEAD_DAYS)
}

/// As [`find_next_rest_day`] with an explicit bound.
pub fn find_next_rest_day_within(
    start: Date,
    dataset: &CalendarDataset,
    limit: u32,
) -> Result<RestDayInfo> {
    let mut day = start;
    for offset in 1..=limit {
        day = day.succ()?;
        let verdict = classify(day, dataset)?;
        if !verdict.is_workday() {
            return Ok(RestDayInfo {
                date: day,
                weekday: day.weekday(),
                weekday_cn: day.weekday().chinese_name(),
                detail: verdict.detail().to_string(),
                days_from_now: offset,
            });
        }
    }
    tracing::error!(
        start = %start,
        limit,
        fingerprint = dataset.fingerprint(),
        "no rest day within lookahead; dataset is corrupt"
    );
    Err(Error::RestDaySearchExceeded {
        start: start.naive(),
        limit,
    })
}
