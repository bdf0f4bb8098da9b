//! # workday
//!
//! Answers "is this date a workday, and when is the next rest day?" for one
//! jurisdiction (mainland China by default), with a best-effort second
//! opinion from an independent public-holiday feed.
//!
//! This crate is a **façade** over the `wd-*` workspace crates and adds the
//! service layer: settings, the on-disk cache, dataset refresh and the query
//! facade that assembles response shapes.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! workday = "0.1"
//! ```
//!
//! ```rust
//! use workday::time::{calendars::china::china, Calendar, Date};
//!
//! let cn = china().unwrap();
//! let new_year = Date::parse("2026年1月1日").unwrap();
//! assert!(!cn.is_workday(new_year).unwrap());
//! assert_eq!(cn.classify(new_year).unwrap().holiday_name(), Some("元旦"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Error definitions and the snapshot handle.
pub use wd_core as core;

/// Dates, datasets, classification and the rest-day search.
pub use wd_time as time;

/// Cross-validation against a secondary holiday feed.
pub use wd_validate as validate;

/// Dataset and feed cache on disk.
pub mod cache;

/// Dataset sources and the refresh coordinator.
pub mod refresh;

/// Query facade and response shapes.
pub mod service;

/// Layered settings.
pub mod settings;

pub use cache::DatasetCache;
pub use refresh::{bootstrap, BuiltinSource, DatasetSource, FileSource, RefreshCoordinator};
pub use service::{DateReport, DayStatus, TodayReport, TomorrowReport, WorkdayService};
pub use settings::Settings;
