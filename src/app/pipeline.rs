//! Shared "update pipeline" logic used by the CLI.
//!
//! load store -> plan window -> fetch batches -> extract rows -> merge -> replace store
//!
//! Every fetch happens before anything is written. A transport failure, an
//! upstream rejection, or a malformed entry under `--on-malformed fail` returns
//! early and leaves the dataset and metadata files exactly as they were.

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use crate::data::{BlsClient, Extraction, FetchRequest, RowExtractor, TimeSeriesSource};
use crate::domain::{MalformedPolicy, Observation, RunMetadata, SeriesCatalog, UpdateConfig};
use crate::error::{AppError, MalformedObservation};
use crate::io::{load_dataset, write_dataset, write_metadata};
use crate::merge::{MergeStats, merge_with_stats};
use crate::schedule::{FetchWindow, RequestLimits, plan_requests, plan_window_with_lookback};

/// Everything a successful update produced.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub dataset: Vec<Observation>,
    pub stats: MergeStats,
    pub window: FetchWindow,
    pub requests: usize,
    pub dropped: Vec<MalformedObservation>,
    pub metadata: RunMetadata,
}

/// Resolve the catalog for a run: the JSON override if given, else the built-in list.
pub fn load_catalog(config: &UpdateConfig) -> Result<SeriesCatalog, AppError> {
    match &config.catalog_path {
        Some(path) => SeriesCatalog::from_json_file(path),
        None => Ok(SeriesCatalog::builtin()),
    }
}

/// Run one update against the live BLS API.
pub fn run_update(config: &UpdateConfig, catalog: &SeriesCatalog) -> Result<UpdateOutcome, AppError> {
    let client = BlsClient::from_env(config.api_url.clone(), config.timeout)?;
    run_update_with_source(config, catalog, &client, Utc::now().year())
}

/// Run one update against any source, with an explicit "current year".
pub fn run_update_with_source<S: TimeSeriesSource>(
    config: &UpdateConfig,
    catalog: &SeriesCatalog,
    source: &S,
    current_year: i32,
) -> Result<UpdateOutcome, AppError> {
    if config.floor_year > current_year {
        return Err(AppError::new(
            2,
            format!(
                "Floor year {} is after the current year {current_year}.",
                config.floor_year
            ),
        ));
    }

    let dataset_path = config.dataset_path();
    let existing = load_dataset(&dataset_path)?;
    info!(rows = existing.len(), path = %dataset_path.display(), "loaded dataset");

    let window = plan_window_with_lookback(&existing, config.floor_year, current_year, config.lookback_years);
    let limits = RequestLimits::for_registration(source.has_api_key());
    let requests = plan_requests(&catalog.ids(), window, limits);
    info!(
        start_year = window.start_year,
        end_year = window.end_year,
        years = window.years(),
        requests = requests.len(),
        backfill = existing.is_empty(),
        "planned fetch"
    );

    let fetched = fetch_all(source, catalog, &requests, config.on_malformed)?;
    let (dataset, stats) = merge_with_stats(existing, fetched.observations);

    write_dataset(&dataset_path, &dataset)?;
    let metadata = RunMetadata::now();
    write_metadata(&config.metadata_path(), &metadata)?;
    info!(
        rows = dataset.len(),
        added = stats.added,
        revised = stats.revised,
        unchanged = stats.unchanged,
        "dataset updated"
    );

    Ok(UpdateOutcome {
        dataset,
        stats,
        window,
        requests: requests.len(),
        dropped: fetched.dropped,
        metadata,
    })
}

/// Issue every request in order and extract all returned series.
pub fn fetch_all<S: TimeSeriesSource>(
    source: &S,
    catalog: &SeriesCatalog,
    requests: &[FetchRequest],
    policy: MalformedPolicy,
) -> Result<Extraction, AppError> {
    let extractor = RowExtractor::new(catalog, policy);
    let mut out = Extraction::default();

    for (idx, request) in requests.iter().enumerate() {
        info!(
            batch = idx + 1,
            of = requests.len(),
            series = request.series_ids.len(),
            start_year = request.start_year,
            end_year = request.end_year,
            "fetching"
        );
        let response = source.fetch(request)?;

        for id in &request.series_ids {
            if !response.series().iter().any(|s| &s.series_id == id) {
                warn!(series_id = %id, "requested series missing from response");
            }
        }

        for payload in response.series() {
            let extracted = extractor.to_rows(payload)?;
            out.observations.extend(extracted.observations);
            out.dropped.extend(extracted.dropped);
        }
    }

    Ok(out)
}
