//! [Nager.Date](https://date.nager.at) public-holiday feed.
//!
//! `GET {base}/PublicHolidays/{year}/{countryCode}` answers a JSON array of
//! `{date, localName, name, ...}` objects.

use async_trait::async_trait;
use serde::Deserialize;
use wd_core::errors::{Error, Result};
use wd_time::Date;

use crate::feed::{FeedYear, HolidayFeed};

/// Base URL of the public Nager.Date API.
pub const DEFAULT_BASE_URL: &str = "https://date.nager.at/api/v3";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerHoliday {
    date: Date,
    local_name: String,
}

/// HTTP client for Nager.Date.
#[derive(Debug, Clone)]
pub struct NagerFeed {
    client: reqwest::Client,
    base_url: String,
}

impl NagerFeed {
    /// Create a feed talking to `base_url` (see [`DEFAULT_BASE_URL`]).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("workday-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Request URL for one jurisdiction and year.
    pub fn url(&self, jurisdiction: &str, year: i32) -> String {
        format!(
            "{}/PublicHolidays/{year}/{}",
            self.base_url.trim_end_matches('/'),
            jurisdiction.to_ascii_uppercase()
        )
    }
}

/// Decode a Nager.Date response body.
pub fn parse_holidays(body: &str) -> Result<FeedYear> {
    let entries: Vec<NagerHoliday> = serde_json::from_str(body)
        .map_err(|e| Error::ExternalSourceUnavailable(format!("malformed response: {e}")))?;
    Ok(entries
        .into_iter()
        .map(|h| (h.date, h.local_name))
        .collect())
}

#[async_trait]
impl HolidayFeed for NagerFeed {
    fn name(&self) -> &str {
        "nager.date"
    }

    async fn public_holidays(&self, jurisdiction: &str, year: i32) -> Result<FeedYear> {
        let url = self.url(jurisdiction, year);
        let unavailable = |e: reqwest::Error| Error::ExternalSourceUnavailable(format!("{url}: {e}"));

        let response = self.client.get(&url).send().await.map_err(unavailable)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::ExternalSourceUnavailable(format!(
                "{url} answered HTTP {status}"
            )));
        }
        let body = response.text().await.map_err(unavailable)?;
        let holidays = parse_holidays(&body)?;
        tracing::info!(feed = self.name(), year, count = holidays.len(), "fetched public holidays");
        Ok(holidays)
    }
}
