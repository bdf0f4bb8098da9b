mod cli;
mod logging;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use workday::core::Error;
use workday::time::{CalendarDataset, InstallOutcome};
use workday::{
    BuiltinSource, DatasetCache, DatasetSource, FileSource, RefreshCoordinator, Settings,
    WorkdayService,
};

use crate::cli::{Cli, Command, RefreshArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        let client_error = e
            .downcast_ref::<Error>()
            .is_some_and(Error::is_client_error);
        process::exit(if client_error { 2 } else { 1 });
    }
}

async fn run(cli: Cli) -> Result<()> {
    let env = std::env::var("WORKDAY_ENV").unwrap_or_else(|_| "development".into());
    let mut settings = Settings::load_from(&cli.config_dir, &env)
        .with_context(|| format!("loading settings from {}", cli.config_dir.display()))?;
    if cli.offline {
        settings.feed.enabled = false;
    }
    tracing::debug!(
        %env,
        jurisdiction = %settings.calendar.jurisdiction,
        timezone = %settings.calendar.timezone,
        feed = settings.feed.enabled,
        "settings loaded"
    );
    let cache = DatasetCache::new(settings.cache.dir.clone());
    let service = WorkdayService::from_settings(&settings)?;

    match cli.command {
        Command::Check(args) => print_json(&service.check_date(&args.date).await?),
        Command::Today => print_json(&service.check_today().await?),
        Command::Tomorrow => print_json(&service.check_tomorrow().await?),
        Command::Dataset => print_json(&DatasetSummary::of(&service.calendar().snapshot())),
        Command::Refresh(args) => refresh(&service, cache, &settings, args),
        Command::Feed => {
            let loaded = service.refresh_feed(service.today(), &cache).await?;
            print_json(&FeedSummary {
                years_loaded: loaded,
                cached_years: service.validator().cached_years(),
            })
        }
    }
}

fn refresh(
    service: &WorkdayService,
    cache: DatasetCache,
    settings: &Settings,
    args: RefreshArgs,
) -> Result<()> {
    let source: Box<dyn DatasetSource> = match args.file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(BuiltinSource::new(settings.calendar.jurisdiction.clone())),
    };
    let coordinator = RefreshCoordinator::new(service.calendar().clone(), cache, source);
    let outcome = if args.force {
        coordinator.refresh_with_override()?
    } else {
        coordinator.refresh_once()?
    };
    print_json(&RefreshSummary {
        outcome: match outcome {
            InstallOutcome::Installed => "installed",
            InstallOutcome::Unchanged => "unchanged",
        },
        dataset: DatasetSummary::of(&coordinator.calendar().snapshot()),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct DatasetSummary {
    jurisdiction: String,
    version: String,
    fingerprint: String,
    first_year: i32,
    last_year: i32,
    holidays: usize,
    makeup_workdays: usize,
}

impl DatasetSummary {
    fn of(dataset: &CalendarDataset) -> Self {
        Self {
            jurisdiction: dataset.jurisdiction().to_string(),
            version: dataset.version().to_string(),
            fingerprint: dataset.fingerprint().to_string(),
            first_year: dataset.first_year(),
            last_year: dataset.last_year(),
            holidays: dataset.holiday_count(),
            makeup_workdays: dataset.makeup_count(),
        }
    }
}

#[derive(Serialize)]
struct RefreshSummary {
    outcome: &'static str,
    dataset: DatasetSummary,
}

#[derive(Serialize)]
struct FeedSummary {
    years_loaded: usize,
    cached_years: Vec<i32>,
}
