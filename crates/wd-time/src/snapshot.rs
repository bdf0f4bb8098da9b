//! `ActiveCalendar`: the installed dataset snapshot.
//!
//! Queries take one `Arc<CalendarDataset>` with [`ActiveCalendar::snapshot`]
//! and answer entirely from it, so a concurrent [`ActiveCalendar::install`]
//! never changes the outcome of a query already in flight.

use std::sync::Arc;

use wd_core::errors::{Error, Result};
use wd_core::handle::{SnapshotHandle, Swap};

use crate::calendar::Calendar;
use crate::classify::DayClassification;
use crate::dataset::CalendarDataset;
use crate::date::Date;
use crate::rest_day::RestDayInfo;

/// Result of a successful install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The new dataset is now active.
    Installed,
    /// The offered dataset has the same fingerprint as the active one.
    Unchanged,
}

/// Shared, atomically replaceable calendar dataset.
#[derive(Debug, Clone)]
pub struct ActiveCalendar {
    jurisdiction: String,
    handle: SnapshotHandle<CalendarDataset>,
}

impl ActiveCalendar {
    /// Start with `dataset` installed.
    pub fn new(dataset: CalendarDataset) -> Self {
        Self {
            jurisdiction: dataset.jurisdiction().to_string(),
            handle: SnapshotHandle::new(dataset),
        }
    }

    /// The snapshot that is active right now.
    pub fn snapshot(&self) -> Arc<CalendarDataset> {
        self.handle.current()
    }

    /// Replace the active dataset.
    ///
    /// # Errors
    /// * [`Error::InvalidDataset`] if the jurisdiction differs.
    /// * [`Error::StaleDataset`] if the offered data ends before the installed
    ///   data does.
    pub fn install(&self, dataset: CalendarDataset) -> Result<InstallOutcome> {
        self.install_inner(dataset, false)
    }

    /// Replace the active dataset even if it covers fewer years.
    pub fn install_with_override(&self, dataset: CalendarDataset) -> Result<InstallOutcome> {
        self.install_inner(dataset, true)
    }

    fn install_inner(&self, dataset: CalendarDataset, allow_rollback: bool) -> Result<InstallOutcome> {
        let offered = Arc::new(dataset);
        let swap = self.handle.install_with(|current| {
            if offered.jurisdiction() != self.jurisdiction {
                return Err(Error::InvalidDataset(format!(
                    "jurisdiction {} cannot replace {}",
                    offered.jurisdiction(),
                    current.jurisdiction()
                )));
            }
            if current.fingerprint() == offered.fingerprint() {
                return Ok(None);
            }
            if !allow_rollback && offered.last_year() < current.last_year() {
                return Err(Error::StaleDataset {
                    installed_last_year: current.last_year(),
                    offered_last_year: offered.last_year(),
                });
            }
            Ok(Some(Arc::clone(&offered)))
        })?;

        match swap {
            Swap::Replaced => {
                tracing::info!(
                    jurisdiction = offered.jurisdiction(),
                    version = offered.version(),
                    fingerprint = offered.fingerprint(),
                    first_year = offered.first_year(),
                    last_year = offered.last_year(),
                    "installed calendar dataset"
                );
                Ok(InstallOutcome::Installed)
            }
            Swap::Kept => {
                tracing::debug!(fingerprint = offered.fingerprint(), "calendar dataset unchanged");
                Ok(InstallOutcome::Unchanged)
            }
        }
    }
}

impl Calendar for ActiveCalendar {
    fn name(&self) -> &str {
        &self.jurisdiction
    }

    fn classify(&self, date: Date) -> Result<DayClassification> {
        self.snapshot().classify(date)
    }

    fn next_rest_day(&self, date: Date) -> Result<RestDayInfo> {
        self.snapshot().next_rest_day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetBuilder;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn dataset(first: i32, last: i32, makeup: Option<Date>) -> CalendarDataset {
        let mut b = DatasetBuilder::new("CN", first, last);
        if let Some(d) = makeup {
            b.add_makeup_workday(d);
        }
        b.build().unwrap()
    }

    #[test]
    fn install_newer() {
        let cal = ActiveCalendar::new(dataset(2025, 2025, None));
        assert_eq!(
            cal.install(dataset(2025, 2026, None)).unwrap(),
            InstallOutcome::Installed
        );
        assert_eq!(cal.snapshot().last_year(), 2026);
    }

    #[test]
    fn same_fingerprint_is_unchanged() {
        let cal = ActiveCalendar::new(dataset(2026, 2026, None));
        assert_eq!(
            cal.install(dataset(2026, 2026, None)).unwrap(),
            InstallOutcome::Unchanged
        );
    }

    #[test]
    fn rollback_needs_override() {
        let cal = ActiveCalendar::new(dataset(2025, 2026, None));
        assert_eq!(
            cal.install(dataset(2024, 2025, None)),
            Err(Error::StaleDataset {
                installed_last_year: 2026,
                offered_last_year: 2025,
            })
        );
        assert_eq!(cal.snapshot().last_year(), 2026);
        assert_eq!(
            cal.install_with_override(dataset(2024, 2025, None)).unwrap(),
            InstallOutcome::Installed
        );
        assert_eq!(cal.snapshot().last_year(), 2025);
    }

    #[test]
    fn same_years_new_content_is_accepted() {
        let cal = ActiveCalendar::new(dataset(2026, 2026, None));
        let sat = date(2026, 2, 28);
        assert!(!cal.is_workday(sat).unwrap());
        cal.install(dataset(2026, 2026, Some(sat))).unwrap();
        assert!(cal.is_workday(sat).unwrap());
    }

    #[test]
    fn other_jurisdiction_is_rejected() {
        let cal = ActiveCalendar::new(dataset(2026, 2026, None));
        let hk = DatasetBuilder::new("HK", 2026, 2027).build().unwrap();
        assert!(matches!(cal.install(hk), Err(Error::InvalidDataset(_))));
    }

    #[test]
    fn lower_case_code_is_the_same_jurisdiction() {
        let cal = ActiveCalendar::new(dataset(2026, 2026, None));
        let lower = DatasetBuilder::new("cn", 2026, 2027).build().unwrap();
        assert_eq!(cal.install(lower).unwrap(), InstallOutcome::Installed);
        assert_eq!(cal.name(), "CN");
    }

    #[test]
    fn held_snapshot_survives_install() {
        let sat = date(2026, 2, 28);
        let cal = ActiveCalendar::new(dataset(2026, 2026, None));
        let before = cal.snapshot();
        cal.install(dataset(2026, 2026, Some(sat))).unwrap();
        assert!(!before.is_workday(sat).unwrap());
        assert!(cal.snapshot().is_workday(sat).unwrap());
    }
}
