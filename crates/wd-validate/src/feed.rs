//! The secondary holiday feed abstraction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use wd_core::errors::Result;
use wd_time::Date;

/// Public holidays published by a feed for one year: date → local name.
pub type FeedYear = BTreeMap<Date, String>;

/// An independent source of public-holiday lists.
///
/// Feeds only know which dates are holidays; they carry no makeup-workday
/// information.
#[async_trait]
pub trait HolidayFeed: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the public holidays of `jurisdiction` in `year`.
    ///
    /// Any transport or decoding failure is reported as
    /// [`wd_core::Error::ExternalSourceUnavailable`].
    async fn public_holidays(&self, jurisdiction: &str, year: i32) -> Result<FeedYear>;
}
