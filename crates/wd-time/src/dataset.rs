//! `CalendarDataset`: an immutable snapshot of legal-calendar facts.
//!
//! A dataset records, for one jurisdiction and a contiguous range of years,
//! which dates are named legal holidays and which weekend dates have been
//! turned into makeup workdays.  Datasets are assembled with a
//! [`DatasetBuilder`] and never change afterwards; a refresh produces a new
//! dataset that replaces the old one wholesale.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use wd_core::ensure;
use wd_core::errors::{Error, Result};

use crate::date::Date;

/// Immutable, versioned set of holiday and makeup-workday facts.
///
/// Invariants, checked by [`DatasetBuilder::build`] and again on
/// deserialisation:
/// * no date is both a holiday and a makeup workday;
/// * every listed date falls inside `first_year..=last_year`;
/// * `fingerprint` is the SHA-256 of the canonical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRecord", into = "DatasetRecord")]
pub struct CalendarDataset {
    jurisdiction: String,
    first_year: i32,
    last_year: i32,
    version: String,
    holidays: BTreeMap<Date, String>,
    makeup_workdays: BTreeSet<Date>,
    fingerprint: String,
}

impl CalendarDataset {
    /// Jurisdiction code, e.g. `"CN"`.
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// First covered year (inclusive).
    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last covered year (inclusive).
    pub fn last_year(&self) -> i32 {
        self.last_year
    }

    /// Covered years as an inclusive range.
    pub fn year_range(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    /// Free-form version label assigned by whoever built the dataset.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Hex SHA-256 of the dataset content (version label excluded).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Return `true` if `date` falls inside the covered years.
    pub fn covers(&self, date: Date) -> bool {
        self.year_range().contains(&date.year())
    }

    /// Fail with [`Error::UnsupportedDateRange`] unless `date` is covered.
    pub fn ensure_covers(&self, date: Date) -> Result<()> {
        if self.covers(date) {
            Ok(())
        } else {
            Err(Error::UnsupportedDateRange {
                date: date.naive(),
                first_year: self.first_year,
                last_year: self.last_year,
            })
        }
    }

    /// Name of the legal holiday on `date`, if any.
    pub fn holiday_name(&self, date: Date) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Return `true` if `date` is a weekend day reclassified as working.
    pub fn is_makeup_workday(&self, date: Date) -> bool {
        self.makeup_workdays.contains(&date)
    }

    /// All holidays in date order.
    pub fn holidays(&self) -> impl Iterator<Item = (Date, &str)> + '_ {
        self.holidays.iter().map(|(d, n)| (*d, n.as_str()))
    }

    /// All makeup workdays in date order.
    pub fn makeup_workdays(&self) -> impl Iterator<Item = Date> + '_ {
        self.makeup_workdays.iter().copied()
    }

    /// Number of holiday entries.
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }

    /// Number of makeup-workday entries.
    pub fn makeup_count(&self) -> usize {
        self.makeup_workdays.len()
    }

    /// Parse a dataset from its JSON form, re-checking every invariant.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidDataset(e.to_string()))
    }

    /// Render the dataset as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidDataset(e.to_string()))
    }
}

/// Incrementally assembles a [`CalendarDataset`].
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    jurisdiction: String,
    first_year: i32,
    last_year: i32,
    version: String,
    holidays: BTreeMap<Date, String>,
    makeup_workdays: BTreeSet<Date>,
}

impl DatasetBuilder {
    /// Start a dataset for `jurisdiction` covering `first_year..=last_year`.
    /// The code is stored upper-case.
    pub fn new(jurisdiction: impl Into<String>, first_year: i32, last_year: i32) -> Self {
        Self {
            jurisdiction: jurisdiction.into().trim().to_ascii_uppercase(),
            first_year,
            last_year,
            version: String::new(),
            holidays: BTreeMap::new(),
            makeup_workdays: BTreeSet::new(),
        }
    }

    /// Set the version label.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Add a named holiday.  A second entry for the same date replaces the
    /// name.
    pub fn add_holiday(&mut self, date: Date, name: impl Into<String>) -> &mut Self {
        self.holidays.insert(date, name.into());
        self
    }

    /// Add `days` consecutive holidays starting at `first`, all sharing `name`.
    pub fn add_holiday_span(&mut self, first: Date, days: u32, name: &str) -> Result<&mut Self> {
        ensure!(days > 0, "holiday span for {name} starting {first} is empty");
        for offset in 0..i64::from(days) {
            self.add_holiday(first.add_days(offset)?, name);
        }
        Ok(self)
    }

    /// Add a makeup workday.
    pub fn add_makeup_workday(&mut self, date: Date) -> &mut Self {
        self.makeup_workdays.insert(date);
        self
    }

    /// Check the invariants and freeze the dataset.
    pub fn build(self) -> Result<CalendarDataset> {
        ensure!(
            !self.jurisdiction.trim().is_empty(),
            "jurisdiction code must not be empty"
        );
        ensure!(
            self.first_year <= self.last_year,
            "year range {}-{} is reversed",
            self.first_year,
            self.last_year
        );

        let years = self.first_year..=self.last_year;
        let all_dates = self
            .holidays
            .keys()
            .chain(self.makeup_workdays.iter());
        for date in all_dates {
            if !years.contains(&date.year()) {
                return Err(Error::InvalidDataset(format!(
                    "{date} lies outside the covered years {}-{}",
                    self.first_year, self.last_year
                )));
            }
        }
        if let Some((date, name)) = self.holidays.iter().find(|(_, n)| n.trim().is_empty()) {
            return Err(Error::InvalidDataset(format!(
                "holiday on {date} has an empty name {name:?}"
            )));
        }
        if let Some(date) = self
            .makeup_workdays
            .iter()
            .find(|d| !d.weekday().is_weekend())
        {
            return Err(Error::InvalidDataset(format!(
                "makeup workday {date} falls on a {}, not a weekend",
                date.weekday()
            )));
        }
        if let Some(date) = self
            .makeup_workdays
            .iter()
            .find(|d| self.holidays.contains_key(*d))
        {
            return Err(Error::InvalidDataset(format!(
                "{date} is both a holiday and a makeup workday"
            )));
        }

        let fingerprint = fingerprint(
            &self.jurisdiction,
            self.first_year,
            self.last_year,
            &self.holidays,
            &self.makeup_workdays,
        );
        Ok(CalendarDataset {
            jurisdiction: self.jurisdiction,
            first_year: self.first_year,
            last_year: self.last_year,
            version: self.version,
            holidays: self.holidays,
            makeup_workdays: self.makeup_workdays,
            fingerprint,
        })
    }
}

fn fingerprint(
    jurisdiction: &str,
    first_year: i32,
    last_year: i32,
    holidays: &BTreeMap<Date, String>,
    makeup_workdays: &BTreeSet<Date>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{jurisdiction}\n{first_year}-{last_year}\n"));
    for (date, name) in holidays {
        hasher.update(format!("H {date} {name}\n"));
    }
    for date in makeup_workdays {
        hasher.update(format!("W {date}\n"));
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ── Serialised form ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HolidayEntry {
    date: Date,
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatasetRecord {
    jurisdiction: String,
    first_year: i32,
    last_year: i32,
    #[serde(default)]
    version: String,
    #[serde(default)]
    holidays: Vec<HolidayEntry>,
    #[serde(default)]
    makeup_workdays: Vec<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

impl TryFrom<DatasetRecord> for CalendarDataset {
    type Error = Error;

    fn try_from(record: DatasetRecord) -> Result<Self> {
        let mut builder = DatasetBuilder::new(record.jurisdiction, record.first_year, record.last_year)
            .version(record.version);
        for entry in record.holidays {
            builder.add_holiday(entry.date, entry.name);
        }
        for date in record.makeup_workdays {
            builder.add_makeup_workday(date);
        }
        let dataset = builder.build()?;
        match record.fingerprint {
            Some(stored) if stored != dataset.fingerprint => Err(Error::InvalidDataset(format!(
                "fingerprint mismatch: stored {stored}, computed {}",
                dataset.fingerprint
            ))),
            _ => Ok(dataset),
        }
    }
}

impl From<CalendarDataset> for DatasetRecord {
    fn from(dataset: CalendarDataset) -> Self {
        DatasetRecord {
            jurisdiction: dataset.jurisdiction,
            first_year: dataset.first_year,
            last_year: dataset.last_year,
            version: dataset.version,
            holidays: dataset
                .holidays
                .into_iter()
                .map(|(date, name)| HolidayEntry { date, name })
                .collect(),
            makeup_workdays: dataset.makeup_workdays.into_iter().collect(),
            fingerprint: Some(dataset.fingerprint),
        }
    }
}
