//! Command-line parsing for the BLS time-series updater.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/merge code. Parsed flags are turned into an `UpdateConfig` in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::MalformedPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bls", version, about = "Incremental BLS time-series updater")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch new and revised observations and rewrite the dataset.
    ///
    /// An empty store is backfilled from `--floor-year`; otherwise only the
    /// trailing `--lookback-years` are re-fetched.
    Update(UpdateArgs),
    /// Print per-series coverage of the stored dataset.
    Coverage(StoreArgs),
}

/// Where the dataset lives and which series it tracks.
#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Directory holding `bls_timeseries.csv` and `meta.json`.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// JSON catalog (`[{id, section, name, freq}]`) replacing the built-in series list.
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Earliest year to request.
    #[arg(long, default_value_t = 2006)]
    pub floor_year: i32,

    /// Trailing years to re-fetch on incremental runs (captures revisions).
    #[arg(long, default_value_t = crate::schedule::DEFAULT_LOOKBACK_YEARS)]
    pub lookback_years: i32,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Time-series endpoint.
    #[arg(long, default_value = crate::data::bls::DEFAULT_API_URL)]
    pub api_url: String,

    /// What to do with entries whose year/value cannot be parsed.
    #[arg(long, value_enum, default_value_t = MalformedPolicy::Skip)]
    pub on_malformed: MalformedPolicy,
}
