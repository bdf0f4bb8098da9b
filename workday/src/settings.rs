//! Service settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;
use wd_core::errors::{Error, Result};

/// Main application settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Which calendar to serve.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Secondary holiday feed.
    #[serde(default)]
    pub feed: FeedConfig,
    /// On-disk cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `WORKDAY_ENV`)
    /// 3. Environment variables prefixed with `WORKDAY_`, sections separated by
    ///    `__` (e.g. `WORKDAY_FEED__TIMEOUT_SECS=3`)
    pub fn load() -> Result<Self> {
        let env = std::env::var("WORKDAY_ENV").unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &env)
    }

    /// Like [`Settings::load`] with an explicit configuration directory and
    /// environment name.
    pub fn load_from(dir: &Path, env: &str) -> Result<Self> {
        let default = dir.join("default");
        let layered = dir.join(env);
        let config = Config::builder()
            .add_source(File::with_name(&default.to_string_lossy()).required(false))
            .add_source(File::with_name(&layered.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("WORKDAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        settings.timezone()?;
        Ok(settings)
    }

    /// The configured time zone, used to decide what "today" is.
    pub fn timezone(&self) -> Result<Tz> {
        self.calendar
            .timezone
            .parse::<Tz>()
            .map_err(|e| Error::Config(format!("unknown time zone {:?}: {e}", self.calendar.timezone)))
    }
}

/// Calendar configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CalendarConfig {
    /// Jurisdiction code
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    /// IANA time zone that defines the local date
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// JSON dataset to install on top of the built-in tables
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            jurisdiction: default_jurisdiction(),
            timezone: default_timezone(),
            dataset_path: None,
        }
    }
}

fn default_jurisdiction() -> String {
    "CN".into()
}

fn default_timezone() -> String {
    "Asia/Shanghai".into()
}

/// Secondary feed configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Consult the feed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Nager.Date API root
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause before retrying a failed year (in seconds)
    #[serde(default = "default_retry_after_secs")]
    pub retry_after_secs: u64,
}

impl FeedConfig {
    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cooldown after a failed fetch.
    pub fn retry_after(&self) -> Duration {
        Duration::from_secs(self.retry_after_secs)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry_after_secs: default_retry_after_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    wd_validate::nager::DEFAULT_BASE_URL.into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_after_secs() -> u64 {
    60
}

/// Cache configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Directory holding dataset and feed cache files
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}
