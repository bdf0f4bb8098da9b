//! Dataset refresh: load from a source, install, persist.
//!
//! The trigger (a timer, an operator command) is up to the caller; a refresh
//! is a data swap on the [`ActiveCalendar`] and never needs a restart.

use std::fmt;
use std::path::{Path, PathBuf};

use wd_core::errors::{Error, Result};
use wd_time::calendars;
use wd_time::{ActiveCalendar, CalendarDataset, InstallOutcome};

use crate::cache::DatasetCache;

/// Somewhere a fresh [`CalendarDataset`] can be obtained from.
pub trait DatasetSource: fmt::Debug + Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Produce the dataset.
    fn load(&self) -> Result<CalendarDataset>;
}

/// Tables compiled into the binary.
#[derive(Debug, Clone)]
pub struct BuiltinSource {
    jurisdiction: String,
}

impl BuiltinSource {
    /// Built-in tables for `jurisdiction`.
    pub fn new(jurisdiction: impl Into<String>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
        }
    }
}

impl DatasetSource for BuiltinSource {
    fn describe(&self) -> String {
        format!("built-in {}", self.jurisdiction)
    }

    fn load(&self) -> Result<CalendarDataset> {
        calendars::builtin(&self.jurisdiction).unwrap_or_else(|| {
            Err(Error::InvalidDataset(format!(
                "no built-in dataset for {}",
                self.jurisdiction
            )))
        })
    }
}

/// A JSON dataset file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Read from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<CalendarDataset> {
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Cache(format!("{}: {e}", self.path.display())))?;
        CalendarDataset::from_json(&json)
    }
}

/// Installs datasets from a [`DatasetSource`] into an [`ActiveCalendar`] and
/// keeps a copy in the [`DatasetCache`].
#[derive(Debug)]
pub struct RefreshCoordinator {
    calendar: ActiveCalendar,
    cache: DatasetCache,
    source: Box<dyn DatasetSource>,
}

impl RefreshCoordinator {
    /// Coordinate refreshes of `calendar` from `source`.
    pub fn new(calendar: ActiveCalendar, cache: DatasetCache, source: Box<dyn DatasetSource>) -> Self {
        Self {
            calendar,
            cache,
            source,
        }
    }

    /// The calendar being refreshed.
    pub fn calendar(&self) -> &ActiveCalendar {
        &self.calendar
    }

    /// Load, install and persist once.  Older data is refused.
    ///
    /// A failure to write the cache after a successful install is logged and
    /// does not undo the install.
    pub fn refresh_once(&self) -> Result<InstallOutcome> {
        self.refresh(false)
    }

    /// Like [`RefreshCoordinator::refresh_once`] but accepts data that covers
    /// fewer years than the installed snapshot.
    pub fn refresh_with_override(&self) -> Result<InstallOutcome> {
        self.refresh(true)
    }

    fn refresh(&self, allow_rollback: bool) -> Result<InstallOutcome> {
        let source = self.source.describe();
        let dataset = self.source.load().map_err(|e| {
            tracing::warn!(%source, error = %e, "dataset refresh failed to load");
            e
        })?;
        let installed = dataset.clone();
        let outcome = if allow_rollback {
            self.calendar.install_with_override(dataset)?
        } else {
            self.calendar.install(dataset)?
        };
        if outcome == InstallOutcome::Installed {
            match self.cache.store(&installed) {
                Ok(path) => tracing::info!(%source, path = %path.display(), "dataset refreshed"),
                Err(e) => tracing::warn!(
                    %source,
                    fingerprint = installed.fingerprint(),
                    error = %e,
                    "dataset installed but not cached"
                ),
            }
        }
        Ok(outcome)
    }
}

/// Assemble the starting calendar for `jurisdiction`.
///
/// The built-in tables (or, failing those, the newest cached dataset) become
/// the initial snapshot.  The newest cached dataset and then `dataset_path`
/// are installed on top; data that is older than what is already installed is
/// skipped.  An explicitly configured file that cannot be read is an error;
/// one that cannot be copied into the cache is not.
pub fn bootstrap(
    jurisdiction: &str,
    cache: &DatasetCache,
    dataset_path: Option<&Path>,
) -> Result<ActiveCalendar> {
    let cached = cache.load_latest(jurisdiction)?;
    let (calendar, cached) = match calendars::builtin(jurisdiction) {
        Some(builtin) => (ActiveCalendar::new(builtin?), cached),
        None => match cached {
            Some(dataset) => (ActiveCalendar::new(dataset), None),
            None => {
                return Err(Error::InvalidDataset(format!(
                    "no dataset available for {jurisdiction}"
                )))
            }
        },
    };

    if let Some(dataset) = cached {
        install_if_newer(&calendar, dataset, "cache")?;
    }
    if let Some(path) = dataset_path {
        let dataset = FileSource::new(path).load()?;
        install_if_newer(&calendar, dataset, &path.display().to_string())?;
        if let Err(e) = cache.store(&calendar.snapshot()) {
            tracing::warn!(path = %path.display(), error = %e, "configured dataset not cached");
        }
    }

    let active = calendar.snapshot();
    tracing::info!(
        jurisdiction = active.jurisdiction(),
        version = active.version(),
        first_year = active.first_year(),
        last_year = active.last_year(),
        "calendar ready"
    );
    Ok(calendar)
}

fn install_if_newer(calendar: &ActiveCalendar, dataset: CalendarDataset, origin: &str) -> Result<()> {
    match calendar.install(dataset) {
        Ok(_) => Ok(()),
        Err(e @ Error::StaleDataset { .. }) => {
            tracing::info!(origin, reason = %e, "keeping newer installed dataset");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
