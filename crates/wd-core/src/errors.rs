//! Error types for workday-rs.
//!
//! Every crate in the workspace reports failures through the single
//! `thiserror`-derived [`Error`] enum defined here.  The `ensure!` and `fail!`
//! convenience macros cover precondition checks and ad hoc runtime failures.

use chrono::NaiveDate;
use thiserror::Error;

/// The top-level error type used throughout workday-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// User input could not be parsed as a calendar date.
    #[error("invalid date format: {input:?}")]
    InvalidDateFormat {
        /// The offending input, echoed back verbatim.
        input: String,
    },

    /// The date lies outside the years covered by the installed dataset.
    #[error("date {date} is outside the supported range {first_year}-{last_year}")]
    UnsupportedDateRange {
        /// The requested date.
        date: NaiveDate,
        /// First covered year (inclusive).
        first_year: i32,
        /// Last covered year (inclusive).
        last_year: i32,
    },

    /// The secondary holiday feed could not be reached or answered garbage.
    #[error("external source unavailable: {0}")]
    ExternalSourceUnavailable(String),

    /// The forward scan for a rest day ran past its bound.
    #[error("no rest day found within {limit} days after {start}")]
    RestDaySearchExceeded {
        /// The date the scan started from (exclusive).
        start: NaiveDate,
        /// Maximum number of days inspected.
        limit: u32,
    },

    /// A dataset older than the installed one was offered without override.
    #[error(
        "stale dataset: installed data covers up to {installed_last_year}, \
         offered data only up to {offered_last_year}"
    )]
    StaleDataset {
        /// Last year covered by the installed snapshot.
        installed_last_year: i32,
        /// Last year covered by the rejected snapshot.
        offered_last_year: i32,
    },

    /// The calendar facts violate a dataset invariant.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Reading or writing the on-disk cache failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// Settings could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),
}

impl Error {
    /// Return `true` if the error is caused by the caller's input and must be
    /// reported as a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidDateFormat { .. } | Error::UnsupportedDateRange { .. }
        )
    }

    /// Return `true` if the error means the calendar data itself is corrupt
    /// and an operator must be alerted.
    pub fn is_data_integrity_fault(&self) -> bool {
        matches!(
            self,
            Error::RestDaySearchExceeded { .. } | Error::InvalidDataset(_)
        )
    }
}

/// Shorthand `Result` type used throughout workday-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use wd_core::{ensure, errors::Error};
/// fn lookahead(days: u32) -> wd_core::errors::Result<u32> {
///     ensure!(days > 0, "lookahead must be positive, got {days}");
///     Ok(days)
/// }
/// assert!(lookahead(7).is_ok());
/// assert!(lookahead(0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use wd_core::{fail, errors::Error};
/// fn always_err() -> wd_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
