//! `ExternalValidator`: best-effort second opinion on a classification.
//!
//! Feed answers are cached per year.  A failed fetch is remembered for
//! [`ExternalValidator::retry_after`] so that a dead feed costs at most one
//! timeout per year and cooldown window instead of one per query.
//! Concurrent queries for a year that is not cached share a single request.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;
use wd_core::errors::{Error, Result};
use wd_time::DayClassification;

use crate::feed::{FeedYear, HolidayFeed};
use crate::result::CrossValidationResult;

/// Default bound on a single feed request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause before retrying a year whose fetch failed.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Compares primary classifications against a [`HolidayFeed`].
pub struct ExternalValidator {
    feed: Option<Arc<dyn HolidayFeed>>,
    jurisdiction: String,
    timeout: Duration,
    retry_after: Duration,
    years: RwLock<HashMap<i32, Arc<FeedYear>>>,
    failures: RwLock<HashMap<i32, Instant>>,
    in_flight: Mutex<HashMap<i32, Arc<AsyncMutex<()>>>>,
}

impl std::fmt::Debug for ExternalValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalValidator")
            .field("feed", &self.feed.as_ref().map(|feed| feed.name().to_string()))
            .field("jurisdiction", &self.jurisdiction)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ExternalValidator {
    /// Validate against `feed` for `jurisdiction`.
    pub fn new(feed: Arc<dyn HolidayFeed>, jurisdiction: impl Into<String>) -> Self {
        Self {
            feed: Some(feed),
            jurisdiction: jurisdiction.into(),
            timeout: DEFAULT_TIMEOUT,
            retry_after: DEFAULT_RETRY_AFTER,
            years: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// A validator with no feed; every result is indeterminate.
    pub fn disabled(jurisdiction: impl Into<String>) -> Self {
        Self {
            feed: None,
            jurisdiction: jurisdiction.into(),
            timeout: DEFAULT_TIMEOUT,
            retry_after: DEFAULT_RETRY_AFTER,
            years: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the cooldown after a failed fetch.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Cooldown after a failed fetch.
    pub fn retry_after(&self) -> Duration {
        self.retry_after
    }

    /// Cross-check `primary` against the feed.
    ///
    /// Never fails: any feed problem yields an indeterminate result without a
    /// warning.
    pub async fn validate(&self, primary: &DayClassification) -> CrossValidationResult {
        if self.feed.is_none() {
            return CrossValidationResult::unavailable(primary, "secondary feed disabled");
        }
        let date = primary.date();
        match self.year(date.year()).await {
            Ok(year) => {
                let result =
                    CrossValidationResult::compare(primary, year.get(&date).map(String::as_str));
                if let Some(warning) = &result.warning {
                    tracing::warn!(%date, discrepancy = ?result.discrepancy, "{warning}");
                }
                result
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "secondary verdict unavailable");
                CrossValidationResult::unavailable(primary, e.to_string())
            }
        }
    }

    /// Fetch (or re-fetch) the given years, replacing cached data on success.
    /// Returns how many years were loaded.
    pub async fn prefetch(&self, years: impl IntoIterator<Item = i32>) -> usize {
        let mut loaded = 0;
        for year in years {
            let gate = self.gate(year);
            let _fetching = gate.lock().await;
            match self.fetch(year).await {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!(year, error = %e, "secondary feed prefetch failed"),
            }
        }
        loaded
    }

    /// Snapshot of the cached feed data, for persistence.
    pub fn export_cache(&self) -> BTreeMap<i32, FeedYear> {
        let years = self.years.read().unwrap_or_else(PoisonError::into_inner);
        years
            .iter()
            .map(|(year, data)| (*year, FeedYear::clone(data)))
            .collect()
    }

    /// Seed the cache from persisted data.  Empty years are ignored.
    pub fn import_cache(&self, data: BTreeMap<i32, FeedYear>) {
        let mut years = self.years.write().unwrap_or_else(PoisonError::into_inner);
        for (year, holidays) in data {
            if !holidays.is_empty() {
                years.insert(year, Arc::new(holidays));
            }
        }
    }

    /// Years currently cached.
    pub fn cached_years(&self) -> Vec<i32> {
        let years = self.years.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<i32> = years.keys().copied().collect();
        out.sort_unstable();
        out
    }

    async fn year(&self, year: i32) -> Result<Arc<FeedYear>> {
        if let Some(known) = self.known(year) {
            return known;
        }
        let gate = self.gate(year);
        let _fetching = gate.lock().await;
        // Whoever held the gate may have settled the year meanwhile.
        if let Some(known) = self.known(year) {
            return known;
        }
        self.fetch(year).await
    }

    /// The cached year, or the cooldown error, without touching the feed.
    fn known(&self, year: i32) -> Option<Result<Arc<FeedYear>>> {
        let cached = self
            .years
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&year)
            .cloned();
        if let Some(cached) = cached {
            return Some(Ok(cached));
        }
        let recent_failure = self
            .failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&year)
            .is_some_and(|at| at.elapsed() < self.retry_after);
        recent_failure.then(|| {
            Err(Error::ExternalSourceUnavailable(format!(
                "feed failed recently for {year}; retrying later"
            )))
        })
    }

    fn gate(&self, year: i32) -> Arc<AsyncMutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(in_flight.entry(year).or_default())
    }

    async fn fetch(&self, year: i32) -> Result<Arc<FeedYear>> {
        let outcome = self.fetch_uncached(year).await;
        match &outcome {
            Ok(data) => {
                self.years
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(year, Arc::clone(data));
                self.failures
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&year);
            }
            Err(_) => {
                self.failures
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(year, Instant::now());
            }
        }
        outcome
    }

    async fn fetch_uncached(&self, year: i32) -> Result<Arc<FeedYear>> {
        let feed = self
            .feed
            .as_ref()
            .ok_or_else(|| Error::ExternalSourceUnavailable("secondary feed disabled".into()))?;
        let holidays = tokio::time::timeout(
            self.timeout,
            feed.public_holidays(&self.jurisdiction, year),
        )
        .await
        .map_err(|_| {
            Error::ExternalSourceUnavailable(format!(
                "{} timed out after {:?}",
                feed.name(),
                self.timeout
            ))
        })??;
        if holidays.is_empty() {
            tracing::warn!(feed = feed.name(), year, "secondary feed has no data for year");
            return Err(Error::ExternalSourceUnavailable(format!(
                "{} has no data for {year}",
                feed.name()
            )));
        }
        Ok(Arc::new(holidays))
    }
}
