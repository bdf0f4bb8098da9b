//! On-disk cache for calendar datasets and secondary feed data.
//!
//! Layout under the cache directory:
//!
//! * `<jurisdiction>-<fingerprint>.json`: one file per dataset ever installed
//! * `feed-<jurisdiction>.json`: the validator's per-year feed data

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use wd_core::errors::{Error, Result};
use wd_time::CalendarDataset;
use wd_validate::FeedYear;

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    dir: PathBuf,
}

impl DatasetCache {
    /// Cache rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `dataset` is (or would be) stored.
    pub fn dataset_path(&self, dataset: &CalendarDataset) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.json",
            dataset.jurisdiction().to_ascii_uppercase(),
            dataset.fingerprint()
        ))
    }

    /// Where the feed data for `jurisdiction` is stored.
    pub fn feed_path(&self, jurisdiction: &str) -> PathBuf {
        self.dir
            .join(format!("feed-{}.json", jurisdiction.to_ascii_uppercase()))
    }

    /// Persist `dataset`.  Files are content-addressed, so an existing file
    /// is left alone.
    pub fn store(&self, dataset: &CalendarDataset) -> Result<PathBuf> {
        let path = self.dataset_path(dataset);
        if path.exists() {
            return Ok(path);
        }
        write_atomic(&path, &dataset.to_json_pretty()?)?;
        tracing::debug!(path = %path.display(), "cached calendar dataset");
        Ok(path)
    }

    /// The cached dataset for `jurisdiction` that reaches furthest into the
    /// future, most recently written first among equals.
    ///
    /// Unreadable or invalid files are skipped with a warning.
    pub fn load_latest(&self, jurisdiction: &str) -> Result<Option<CalendarDataset>> {
        let prefix = format!("{}-", jurisdiction.to_ascii_uppercase());
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_error(&self.dir, e)),
        };

        let mut best: Option<(i32, std::time::SystemTime, CalendarDataset)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| cache_error(&self.dir, e))?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(&prefix) || !name.ends_with(".json") {
                continue;
            }
            let dataset = match fs::read_to_string(&path)
                .map_err(|e| cache_error(&path, e))
                .and_then(|json| CalendarDataset::from_json(&json))
            {
                Ok(dataset) => dataset,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping cached dataset");
                    continue;
                }
            };
            if !dataset.jurisdiction().eq_ignore_ascii_case(jurisdiction) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::UNIX_EPOCH);
            let newer = best
                .as_ref()
                .map_or(true, |(last, at, _)| (dataset.last_year(), modified) > (*last, *at));
            if newer {
                best = Some((dataset.last_year(), modified, dataset));
            }
        }
        Ok(best.map(|(_, _, dataset)| dataset))
    }

    /// Persist the validator's feed data.
    pub fn store_feed(&self, jurisdiction: &str, data: &BTreeMap<i32, FeedYear>) -> Result<()> {
        let path = self.feed_path(jurisdiction);
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Error::Cache(format!("cannot encode feed cache: {e}")))?;
        write_atomic(&path, &json)
    }

    /// Load persisted feed data.  A missing file is empty; a corrupt one is
    /// ignored with a warning.
    pub fn load_feed(&self, jurisdiction: &str) -> Result<BTreeMap<i32, FeedYear>> {
        let path = self.feed_path(jurisdiction);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(cache_error(&path, e)),
        };
        match serde_json::from_str(&json) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable feed cache");
                Ok(BTreeMap::new())
            }
        }
    }
}

fn cache_error(path: &Path, e: std::io::Error) -> Error {
    Error::Cache(format!("{}: {e}", path.display()))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| cache_error(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| cache_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| cache_error(path, e))
}
