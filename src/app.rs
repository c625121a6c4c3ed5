//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - runs the update pipeline or the coverage report
//! - prints summaries

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, StoreArgs, UpdateArgs};
use crate::domain::UpdateConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bls` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Update(args) => handle_update(args),
        Command::Coverage(args) => handle_coverage(args),
    }
}

/// Log to stderr so stdout stays reserved for reports. `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_update(args: UpdateArgs) -> Result<(), AppError> {
    let config = update_config_from_args(&args)?;
    let catalog = pipeline::load_catalog(&config)?;

    let outcome = pipeline::run_update(&config, &catalog)?;

    println!(
        "{}",
        crate::report::format_update_summary(
            outcome.dataset.len(),
            &outcome.stats,
            outcome.dropped.len(),
            &outcome.metadata,
            &config.dataset_path(),
        )
    );
    println!(
        "{}",
        crate::report::format_coverage(&crate::report::coverage(&outcome.dataset), &catalog)
    );
    Ok(())
}

fn handle_coverage(args: StoreArgs) -> Result<(), AppError> {
    let config = UpdateConfig {
        data_dir: args.data_dir.clone(),
        catalog_path: args.catalog.clone(),
        ..UpdateConfig::default()
    };
    let catalog = pipeline::load_catalog(&config)?;

    let rows = crate::io::load_dataset(&config.dataset_path())?;
    match crate::io::read_metadata(&config.metadata_path())? {
        Some(meta) => println!("Last updated (UTC): {}", meta.last_updated_utc.to_rfc3339()),
        None => println!("Last updated (UTC): never"),
    }
    println!("Rows: {}", rows.len());
    println!(
        "{}",
        crate::report::format_coverage(&crate::report::coverage(&rows), &catalog)
    );
    Ok(())
}

pub fn update_config_from_args(args: &UpdateArgs) -> Result<UpdateConfig, AppError> {
    if args.timeout_secs == 0 {
        return Err(AppError::new(2, "--timeout-secs must be at least 1."));
    }
    Ok(UpdateConfig {
        data_dir: args.store.data_dir.clone(),
        floor_year: args.floor_year,
        lookback_years: args.lookback_years,
        api_url: args.api_url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
        on_malformed: args.on_malformed,
        catalog_path: args.store.catalog.clone(),
    })
}

/// Rewrite argv so `bls` defaults to `bls update`.
///
/// Rules:
/// - `bls`                       -> `bls update`
/// - `bls --floor-year 2010 ...` -> `bls update --floor-year 2010 ...`
/// - `bls --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("update".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "update".to_string());
    }
    argv
}
