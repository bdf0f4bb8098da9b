//! End-to-end checks of the query facade.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use workday::core::errors::{Error, Result};
use workday::time::calendars::china::china;
use workday::time::{ActiveCalendar, Date, DatasetBuilder, InstallOutcome};
use workday::validate::{Discrepancy, ExternalValidator, FeedYear, HolidayFeed};
use workday::{DatasetCache, FileSource, RefreshCoordinator, WorkdayService};

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn offline_service() -> WorkdayService {
    WorkdayService::new(
        ActiveCalendar::new(china().unwrap()),
        ExternalValidator::disabled("CN"),
        chrono_tz::Asia::Shanghai,
    )
}

/// Knows the 2026 holidays but nothing about makeup days.
struct HolidayOnlyFeed;

#[async_trait]
impl HolidayFeed for HolidayOnlyFeed {
    fn name(&self) -> &str {
        "holidays-only"
    }

    async fn public_holidays(&self, _jurisdiction: &str, year: i32) -> Result<FeedYear> {
        let dataset = china()?;
        Ok(dataset
            .holidays()
            .filter(|(date, _)| date.year() == year)
            .map(|(date, name)| (date, name.to_string()))
            .collect::<BTreeMap<_, _>>())
    }
}

fn online_service() -> WorkdayService {
    WorkdayService::new(
        ActiveCalendar::new(china().unwrap()),
        ExternalValidator::new(Arc::new(HolidayOnlyFeed), "CN"),
        chrono_tz::Asia::Shanghai,
    )
}

// ---------------------------------------------------------------------------
// Date queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_years_day() {
    let report = offline_service().check_date("2026-01-01").await.unwrap();
    let day = &report.status.classification;
    assert!(!day.is_workday());
    assert_eq!(day.detail(), "元旦");
    assert_eq!(day.holiday_name(), Some("元旦"));
    assert_eq!(report.status.validation.matches, None);
    assert!(report.status.validation.warning.is_none());

    let next = report.next_rest_day.unwrap();
    assert_eq!(next.date, d(2026, 1, 2));
    assert_eq!(next.days_from_now, 1);
}

#[tokio::test]
async fn every_input_form_names_the_same_day() {
    let service = offline_service();
    for input in [
        "2026-02-25",
        "2026-2-25",
        "2026_02_25",
        "2026_2_25",
        "20260225",
        "2026年02月25日",
        "2026年2月25日",
    ] {
        let report = service.check_date(input).await.unwrap();
        assert_eq!(report.status.classification.date(), d(2026, 2, 25), "{input}");
        assert!(report.status.classification.is_workday(), "{input}");
        // 2026-02-28 is a makeup workday, so the first rest day is Sunday.
        let next = report.next_rest_day.unwrap();
        assert_eq!(next.date, d(2026, 3, 1), "{input}");
        assert_eq!(next.days_from_now, 4, "{input}");
    }
}

#[tokio::test]
async fn bad_input_is_echoed() {
    let service = offline_service();
    for input in ["tomorrow", "2026-02-30", "2026/02/25", ""] {
        assert_eq!(
            service.check_date(input).await.unwrap_err(),
            Error::InvalidDateFormat {
                input: input.to_string()
            }
        );
    }
}

#[tokio::test]
async fn uncovered_year_is_a_client_error() {
    let err = offline_service().check_date("2031-06-01").await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedDateRange { .. }));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn next_rest_day_past_the_dataset_is_null() {
    // 2026-12-31 is a Thursday; the following Friday is outside the data.
    let report = offline_service().check_date("2026-12-31").await.unwrap();
    assert!(report.status.classification.is_workday());
    assert!(report.next_rest_day.is_none());
}

#[tokio::test]
async fn date_report_json_shape() {
    let report = offline_service().check_date("2026-03-04").await.unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["date"], "2026-03-04");
    assert_eq!(json["is_workday"], true);
    assert_eq!(json["detail"], "normal workday");
    assert!(json.get("holiday_name").is_none());
    assert!(json["validation"]["matches"].is_null());
    assert_eq!(json["next_rest_day"]["date"], "2026-03-07");
    assert_eq!(json["next_rest_day"]["days_from_now"], 3);
}

// ---------------------------------------------------------------------------
// Today / tomorrow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn eve_of_golden_week() {
    let report = offline_service()
        .check_tomorrow_from(d(2026, 9, 30))
        .await
        .unwrap();
    assert!(report.today.classification.is_workday());
    assert!(!report.tomorrow.classification.is_workday());
    assert_eq!(report.tomorrow.classification.holiday_name(), Some("国庆节"));
    let next = report.next_rest_day.as_ref().unwrap();
    assert_eq!(next.date, d(2026, 10, 1));
    assert_eq!(next.detail, "国庆节");
    assert_eq!(next.days_from_now, 1);

    let json = serde_json::to_value(&report).unwrap();
    for key in ["today", "tomorrow", "next_rest_day"] {
        assert!(json.get(key).is_some(), "{key}");
    }
}

#[tokio::test]
async fn makeup_saturday_today() {
    let report = online_service()
        .check_today_from(d(2026, 2, 14))
        .await
        .unwrap();
    assert!(report.today.classification.is_workday());
    assert_eq!(report.today.classification.detail(), "makeup workday");
    let validation = &report.today.validation;
    assert_eq!(validation.matches, Some(false));
    assert_eq!(validation.discrepancy, Some(Discrepancy::MakeupWorkday));
    assert!(validation.warning.is_some());
    assert_eq!(report.next_rest_day.unwrap().date, d(2026, 2, 15));
}

#[tokio::test]
async fn holidays_agree_with_feed() {
    let report = online_service().check_date("2026-10-05").await.unwrap();
    assert_eq!(report.status.validation.matches, Some(true));
    assert!(report.status.validation.warning.is_none());
}

#[tokio::test]
async fn wall_clock_today_is_answerable_or_out_of_range() {
    let service = offline_service();
    let today = service.today();
    match service.check_today().await {
        Ok(report) => assert_eq!(report.today.classification.date(), today),
        Err(e) => assert!(matches!(e, Error::UnsupportedDateRange { .. })),
    }
}

// ---------------------------------------------------------------------------
// Refresh while serving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_extends_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = DatasetBuilder::new("CN", 2026, 2027).version("test-2027");
    builder.add_holiday(d(2027, 1, 1), "元旦");
    let extended = builder.build().unwrap();
    let file = dir.path().join("cn-2027.json");
    std::fs::write(&file, extended.to_json_pretty().unwrap()).unwrap();

    let calendar = ActiveCalendar::new(china().unwrap());
    let service = WorkdayService::new(
        calendar.clone(),
        ExternalValidator::disabled("CN"),
        chrono_tz::Asia::Shanghai,
    );
    assert!(service.check_date("2027-01-01").await.is_err());

    let coordinator = RefreshCoordinator::new(
        calendar,
        DatasetCache::new(dir.path().join("cache")),
        Box::new(FileSource::new(&file)),
    );
    assert_eq!(coordinator.refresh_once().unwrap(), InstallOutcome::Installed);

    let report = service.check_date("2027-01-01").await.unwrap();
    assert_eq!(report.status.classification.holiday_name(), Some("元旦"));
}

#[tokio::test]
async fn feed_refresh_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DatasetCache::new(dir.path());
    let service = online_service();
    // The feed only has data up to 2026.
    assert_eq!(service.refresh_feed(d(2026, 6, 1), &cache).await.unwrap(), 1);

    let stored = cache.load_feed("CN").unwrap();
    assert_eq!(stored.keys().copied().collect::<Vec<_>>(), vec![2026]);
    assert_eq!(
        stored[&2026].get(&d(2026, 2, 17)).map(String::as_str),
        Some("春节")
    );
}
