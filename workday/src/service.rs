//! Query facade: classification, cross-validation and the next rest day,
//! assembled into response shapes.

use chrono_tz::Tz;
use serde::Serialize;
use wd_core::errors::{Error, Result};
use wd_time::{
    find_next_rest_day, ActiveCalendar, Calendar, CalendarDataset, Date, DayClassification,
    RestDayInfo,
};
use wd_validate::{CrossValidationResult, ExternalValidator, NagerFeed};

use crate::cache::DatasetCache;
use crate::refresh::bootstrap;
use crate::settings::Settings;

/// One day's verdict plus its cross-check.
///
/// Serialises as the flat classification fields followed by `validation`.
#[derive(Debug, Clone, Serialize)]
pub struct DayStatus {
    /// Primary verdict.
    #[serde(flatten)]
    pub classification: DayClassification,
    /// Second opinion.
    pub validation: CrossValidationResult,
}

/// Answer to a query for an explicit date.
#[derive(Debug, Clone, Serialize)]
pub struct DateReport {
    /// The queried day.
    #[serde(flatten)]
    pub status: DayStatus,
    /// First rest day after the queried date; `null` past the end of the
    /// dataset.
    pub next_rest_day: Option<RestDayInfo>,
}

/// Answer to "what about today?".
#[derive(Debug, Clone, Serialize)]
pub struct TodayReport {
    /// Today.
    pub today: DayStatus,
    /// First rest day after today.
    pub next_rest_day: Option<RestDayInfo>,
}

/// Answer to "what about tomorrow?".
#[derive(Debug, Clone, Serialize)]
pub struct TomorrowReport {
    /// Today.
    pub today: DayStatus,
    /// Tomorrow.
    pub tomorrow: DayStatus,
    /// First rest day after today.
    pub next_rest_day: Option<RestDayInfo>,
}

/// The workday service.
#[derive(Debug)]
pub struct WorkdayService {
    calendar: ActiveCalendar,
    validator: ExternalValidator,
    timezone: Tz,
}

impl WorkdayService {
    /// Compose a service from its parts.
    pub fn new(calendar: ActiveCalendar, validator: ExternalValidator, timezone: Tz) -> Self {
        Self {
            calendar,
            validator,
            timezone,
        }
    }

    /// Build the calendar, validator and feed cache described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let jurisdiction = settings.calendar.jurisdiction.as_str();
        let cache = DatasetCache::new(settings.cache.dir.clone());
        let calendar = bootstrap(
            jurisdiction,
            &cache,
            settings.calendar.dataset_path.as_deref(),
        )?;

        let validator = if settings.feed.enabled {
            let feed = NagerFeed::new(settings.feed.base_url.clone())?;
            ExternalValidator::new(std::sync::Arc::new(feed), jurisdiction)
                .with_timeout(settings.feed.timeout())
                .with_retry_after(settings.feed.retry_after())
        } else {
            ExternalValidator::disabled(jurisdiction)
        };
        validator.import_cache(cache.load_feed(jurisdiction)?);

        Ok(Self::new(calendar, validator, settings.timezone()?))
    }

    /// The installed calendar.
    pub fn calendar(&self) -> &ActiveCalendar {
        &self.calendar
    }

    /// The cross-validator.
    pub fn validator(&self) -> &ExternalValidator {
        &self.validator
    }

    /// Today's date in the configured time zone.
    pub fn today(&self) -> Date {
        Date::today_in(&self.timezone)
    }

    /// Status of the date written in `input`, with the next rest day after it.
    pub async fn check_date(&self, input: &str) -> Result<DateReport> {
        let date = Date::parse(input)?;
        let snapshot = self.calendar.snapshot();
        let status = self.status(&snapshot, date).await?;
        let next_rest_day = next_rest_day(&snapshot, date)?;
        Ok(DateReport {
            status,
            next_rest_day,
        })
    }

    /// Status of today.
    pub async fn check_today(&self) -> Result<TodayReport> {
        self.check_today_from(self.today()).await
    }

    /// Status of `today`, which the caller supplies.
    pub async fn check_today_from(&self, today: Date) -> Result<TodayReport> {
        let snapshot = self.calendar.snapshot();
        Ok(TodayReport {
            today: self.status(&snapshot, today).await?,
            next_rest_day: next_rest_day(&snapshot, today)?,
        })
    }

    /// Status of today and tomorrow.
    pub async fn check_tomorrow(&self) -> Result<TomorrowReport> {
        self.check_tomorrow_from(self.today()).await
    }

    /// Status of `today` and the day after.
    pub async fn check_tomorrow_from(&self, today: Date) -> Result<TomorrowReport> {
        let snapshot = self.calendar.snapshot();
        let tomorrow = today.succ()?;
        Ok(TomorrowReport {
            today: self.status(&snapshot, today).await?,
            tomorrow: self.status(&snapshot, tomorrow).await?,
            next_rest_day: next_rest_day(&snapshot, today)?,
        })
    }

    /// Fetch feed data for the year of `today` and the next one, then
    /// persist whatever the validator holds.  Returns the number of years
    /// fetched.
    pub async fn refresh_feed(&self, today: Date, cache: &DatasetCache) -> Result<usize> {
        let loaded = self.validator.prefetch([today.year(), today.year() + 1]).await;
        cache.store_feed(self.calendar.name(), &self.validator.export_cache())?;
        Ok(loaded)
    }

    async fn status(&self, snapshot: &CalendarDataset, date: Date) -> Result<DayStatus> {
        let classification = wd_time::classify(date, snapshot)?;
        let validation = self.validator.validate(&classification).await;
        Ok(DayStatus {
            classification,
            validation,
        })
    }
}

fn next_rest_day(snapshot: &CalendarDataset, start: Date) -> Result<Option<RestDayInfo>> {
    match find_next_rest_day(start, snapshot) {
        Ok(info) => Ok(Some(info)),
        Err(e @ Error::UnsupportedDateRange { .. }) => {
            tracing::warn!(%start, reason = %e, "next rest day lies beyond the dataset");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
