//! Property tests for classification precedence and the rest-day search.

use proptest::prelude::*;
use wd_time::calendars::china::china;
use wd_time::{classify, find_next_rest_day, CalendarDataset, DatasetBuilder, Date, DayKind};

fn date_2026(ordinal: u32) -> Date {
    let base = Date::from_ymd(2026, 1, 1).unwrap();
    base.add_days(i64::from(ordinal)).unwrap()
}

/// A 2026 dataset with arbitrary holidays and makeup days (disjoint by
/// construction: a date goes to at most one set).
fn arb_dataset() -> impl Strategy<Value = CalendarDataset> {
    prop::collection::vec((0u32..365, 0u8..3), 0..60).prop_map(|entries| {
        let mut b = DatasetBuilder::new("CN", 2026, 2026);
        let mut used = std::collections::HashSet::new();
        for (ordinal, which) in entries {
            if !used.insert(ordinal) {
                continue;
            }
            let d = date_2026(ordinal);
            match which {
                0 => {
                    b.add_holiday(d, format!("holiday-{ordinal}"));
                }
                1 if d.weekday().is_weekend() => {
                    b.add_makeup_workday(d);
                }
                _ => {}
            }
        }
        b.build().unwrap()
    })
}

proptest! {
    #[test]
    fn classification_is_deterministic(ds in arb_dataset(), ordinal in 0u32..365) {
        let d = date_2026(ordinal);
        prop_assert_eq!(classify(d, &ds).unwrap(), classify(d, &ds).unwrap());
    }

    #[test]
    fn precedence_holds(ds in arb_dataset(), ordinal in 0u32..365) {
        let d = date_2026(ordinal);
        let c = classify(d, &ds).unwrap();
        if ds.is_makeup_workday(d) {
            prop_assert!(c.is_workday());
            prop_assert_eq!(c.detail(), "makeup workday");
        } else if let Some(name) = ds.holiday_name(d) {
            prop_assert!(!c.is_workday());
            prop_assert_eq!(c.holiday_name(), Some(name));
        } else if d.weekday().is_weekend() {
            prop_assert_eq!(c.kind(), &DayKind::Weekend);
            prop_assert_eq!(c.detail(), "weekend");
        } else {
            prop_assert!(c.is_workday());
            prop_assert_eq!(c.detail(), "normal workday");
        }
        prop_assert_eq!(c.holiday_name().is_some(), matches!(c.kind(), DayKind::Holiday(_)));
    }

    #[test]
    fn next_rest_day_is_minimal(ds in arb_dataset(), ordinal in 0u32..340) {
        let start = date_2026(ordinal);
        // Late-December starts may legitimately walk off a one-year dataset.
        if let Ok(info) = find_next_rest_day(start, &ds) {
            prop_assert!(info.date > start);
            prop_assert!(!classify(info.date, &ds).unwrap().is_workday());
            prop_assert_eq!(i64::from(info.days_from_now), start.days_between(info.date));
            let mut d = start.succ().unwrap();
            while d < info.date {
                prop_assert!(classify(d, &ds).unwrap().is_workday(), "{} skipped", d);
                d = d.succ().unwrap();
            }
        }
    }

    #[test]
    fn builtin_china_has_a_rest_day_every_week(ordinal in 0u32..700) {
        let ds = china().unwrap();
        let start = Date::from_ymd(2025, 1, 1).unwrap().add_days(i64::from(ordinal)).unwrap();
        let info = find_next_rest_day(start, &ds).unwrap();
        prop_assert!(info.days_from_now <= 7);
    }
}
