use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mainland China workday checker.
#[derive(Parser)]
#[command(
    name = "workday",
    version,
    about = "Is it a workday? Classifies dates against the legal holiday calendar"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding `default.toml` and per-environment overrides.
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    /// Skip the secondary holiday feed.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Classify one date (e.g. 2026-02-25, 20260225, 2026年2月25日).
    Check(CheckArgs),
    /// Classify today.
    Today,
    /// Classify today and tomorrow.
    Tomorrow,
    /// Summarise the active calendar dataset.
    Dataset,
    /// Install a dataset and keep a copy in the cache.
    Refresh(RefreshArgs),
    /// Fetch the secondary feed for this year and next and cache it.
    Feed,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// The date to classify.
    pub date: String,
}

/// Arguments for the `refresh` subcommand.
#[derive(clap::Args)]
pub struct RefreshArgs {
    /// JSON dataset file; the built-in tables when omitted.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Accept data that covers fewer years than the installed snapshot.
    #[arg(long)]
    pub force: bool,
}
