//! Day classification against a [`CalendarDataset`].
//!
//! Precedence, highest first:
//!
//! 1. makeup workday → workday
//! 2. legal holiday → rest day, named
//! 3. Saturday / Sunday → rest day
//! 4. anything else → workday
//!
//! Explicit dataset facts always override the generic weekend rule.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use wd_core::errors::Result;

use crate::dataset::CalendarDataset;
use crate::date::Date;
use crate::weekday::Weekday;

/// Detail string for an ordinary working weekday.
pub const DETAIL_NORMAL_WORKDAY: &str = "normal workday";
/// Detail string for an ordinary Saturday or Sunday.
pub const DETAIL_WEEKEND: &str = "weekend";
/// Detail string for a weekend day reclassified as working.
pub const DETAIL_MAKEUP_WORKDAY: &str = "makeup workday";

/// Why a date is (or is not) a workday.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DayKind {
    /// Monday–Friday with no dataset entry.
    NormalWorkday,
    /// Weekend day listed as a makeup workday.
    MakeupWorkday,
    /// Saturday or Sunday with no dataset entry.
    Weekend,
    /// Named legal holiday.
    Holiday(String),
}

impl DayKind {
    /// Return `true` for the two working kinds.
    pub fn is_workday(&self) -> bool {
        matches!(self, DayKind::NormalWorkday | DayKind::MakeupWorkday)
    }

    /// Human-readable reason.
    pub fn detail(&self) -> &str {
        match self {
            DayKind::NormalWorkday => DETAIL_NORMAL_WORKDAY,
            DayKind::MakeupWorkday => DETAIL_MAKEUP_WORKDAY,
            DayKind::Weekend => DETAIL_WEEKEND,
            DayKind::Holiday(name) => name,
        }
    }
}

/// The verdict for one date.
///
/// Serialises flat as `{date, weekday, is_workday, detail, holiday_name?}`;
/// `holiday_name` appears only for legal holidays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayClassification {
    date: Date,
    kind: DayKind,
}

impl DayClassification {
    /// The classified date.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Weekday of the classified date.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// The tagged reason.
    pub fn kind(&self) -> &DayKind {
        &self.kind
    }

    /// Return `true` if business operations take place on this date.
    pub fn is_workday(&self) -> bool {
        self.kind.is_workday()
    }

    /// Human-readable reason.
    pub fn detail(&self) -> &str {
        self.kind.detail()
    }

    /// Name of the legal holiday, if the date is one.
    pub fn holiday_name(&self) -> Option<&str> {
        match &self.kind {
            DayKind::Holiday(name) => Some(name),
            _ => None,
        }
    }
}

impl Serialize for DayClassification {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let holiday = self.holiday_name();
        let fields = if holiday.is_some() { 6 } else { 5 };
        let mut s = serializer.serialize_struct("DayClassification", fields)?;
        s.serialize_field("date", &self.date)?;
        s.serialize_field("weekday", &self.weekday())?;
        s.serialize_field("weekday_cn", self.weekday().chinese_name())?;
        s.serialize_field("is_workday", &self.is_workday())?;
        s.serialize_field("detail", self.detail())?;
        match holiday {
            Some(name) => s.serialize_field("holiday_name", name)?,
            None => s.skip_field("holiday_name")?,
        }
        s.end()
    }
}

/// Classify `date` against `dataset`.
///
/// # Errors
/// [`wd_core::Error::UnsupportedDateRange`] if the year is not covered.
pub fn classify(date: Date, dataset: &CalendarDataset) -> Result<DayClassification> {
    dataset.ensure_covers(date)?;
    let kind = if dataset.is_makeup_workday(date) {
        DayKind::MakeupWorkday
    } else if let Some(name) = dataset.holiday_name(date) {
        DayKind::Holiday(name.to_string())
    } else if date.weekday().is_weekend() {
        DayKind::Weekend
    } else {
        DayKind::NormalWorkday
    };
    Ok(DayClassification { date, kind })
}
