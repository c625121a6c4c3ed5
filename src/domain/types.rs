//! Shared domain types.
//!
//! These types are intentionally small and serializable so they can be:
//!
//! - merged in-memory across runs
//! - written to the CSV store / metadata JSON
//! - reloaded by read-only consumers (coverage reports, dashboards)

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One tidy data point.
///
/// `date` is always the first day of the representative month: the month
/// itself for monthly series, Mar/Jun/Sep/Dec for quarterly ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub series_id: String,
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(series_id: impl Into<String>, date: NaiveDate, value: f64) -> Self {
        Self {
            series_id: series_id.into(),
            date,
            value,
        }
    }
}

/// Informational metadata written alongside the dataset after each successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub last_updated_utc: DateTime<Utc>,
}

impl RunMetadata {
    pub fn now() -> Self {
        Self {
            last_updated_utc: Utc::now(),
        }
    }
}

/// What to do with a data entry whose year or value cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the entry, log it, and keep the rest of the payload.
    #[default]
    Skip,
    /// Abort the run on the first malformed entry.
    Fail,
}

/// A full update run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub data_dir: PathBuf,
    /// Earliest year ever requested.
    pub floor_year: i32,
    /// Trailing years re-fetched on incremental runs to absorb revisions.
    pub lookback_years: i32,
    pub api_url: String,
    pub timeout: Duration,
    pub on_malformed: MalformedPolicy,
    /// Optional JSON catalog replacing the built-in series list.
    pub catalog_path: Option<PathBuf>,
}

impl UpdateConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(crate::io::DATASET_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(crate::io::METADATA_FILE)
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            floor_year: 2006,
            lookback_years: 2,
            api_url: crate::data::bls::DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(60),
            on_malformed: MalformedPolicy::Skip,
            catalog_path: None,
        }
    }
}
