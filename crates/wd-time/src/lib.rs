//! # wd-time
//!
//! Dates, calendar datasets, day classification, and the forward search for
//! the next rest day.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Calendar trait.
pub mod calendar;

/// Built-in jurisdiction datasets.
pub mod calendars;

/// Date classification.
pub mod classify;

/// `CalendarDataset` and its builder.
pub mod dataset;

/// `Date` type.
pub mod date;

/// Next-rest-day search.
pub mod rest_day;

/// The installed dataset snapshot.
pub mod snapshot;

/// `Weekday`: day of the week.
pub mod weekday;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use calendar::Calendar;
pub use classify::{classify, DayClassification, DayKind};
pub use dataset::{CalendarDataset, DatasetBuilder};
pub use date::Date;
pub use rest_day::{find_next_rest_day, RestDayInfo, MAX_LOOKAHEAD_DAYS};
pub use snapshot::{ActiveCalendar, InstallOutcome};
pub use weekday::Weekday;
