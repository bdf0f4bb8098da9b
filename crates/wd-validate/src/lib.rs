//! # wd-validate
//!
//! Cross-validation of primary workday verdicts against an independent
//! public-holiday feed.  The feed augments answers; it never gates them.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Holiday feed trait.
pub mod feed;

/// Nager.Date HTTP feed.
pub mod nager;

/// Cross-validation result types.
pub mod result;

/// The validator.
pub mod validator;

pub use feed::{FeedYear, HolidayFeed};
pub use nager::NagerFeed;
pub use result::{CrossValidationResult, Discrepancy, SecondaryVerdict, Verdict};
pub use validator::ExternalValidator;
