//! Fetch-window planning.
//!
//! An empty store triggers a full backfill from the floor year. Otherwise we
//! re-fetch a trailing window ending at the current year so that revisions to
//! recently published figures are picked up by the merge.
//!
//! The API caps both the number of series and the number of years per request,
//! so a window is further split into request-sized batches.

use chrono::Datelike;

use crate::data::FetchRequest;
use crate::domain::Observation;
use crate::merge::max_date;

/// Default number of trailing years re-fetched on incremental runs.
pub const DEFAULT_LOOKBACK_YEARS: i32 = 2;

/// Closed year interval `[start_year, end_year]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start_year: i32,
    pub end_year: i32,
}

impl FetchWindow {
    pub fn years(&self) -> i32 {
        self.end_year - self.start_year + 1
    }
}

/// Per-request ceilings imposed by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub max_series: usize,
    pub max_years: i32,
}

impl RequestLimits {
    /// v2 limits: 50 series / 20 years registered, 25 series / 10 years otherwise.
    pub fn for_registration(has_api_key: bool) -> Self {
        if has_api_key {
            Self { max_series: 50, max_years: 20 }
        } else {
            Self { max_series: 25, max_years: 10 }
        }
    }
}

/// Choose the window using the default two-year lookback.
pub fn plan_window(existing: &[Observation], floor_year: i32, current_year: i32) -> FetchWindow {
    plan_window_with_lookback(existing, floor_year, current_year, DEFAULT_LOOKBACK_YEARS)
}

pub fn plan_window_with_lookback(
    existing: &[Observation],
    floor_year: i32,
    current_year: i32,
    lookback_years: i32,
) -> FetchWindow {
    let start_year = match max_date(existing) {
        None => floor_year,
        Some(last) => floor_year.max(last.year() - lookback_years.max(0)),
    };

    FetchWindow {
        start_year: start_year.min(current_year),
        end_year: current_year,
    }
}

/// Split a window and series list into requests that respect `limits`.
///
/// Year spans are ordered oldest first; within a span, series keep their input order.
pub fn plan_requests(series_ids: &[String], window: FetchWindow, limits: RequestLimits) -> Vec<FetchRequest> {
    let max_series = limits.max_series.max(1);
    let max_years = limits.max_years.max(1);

    let mut requests = Vec::new();
    let mut span_start = window.start_year;
    while span_start <= window.end_year {
        let span_end = (span_start + max_years - 1).min(window.end_year);
        for chunk in series_ids.chunks(max_series) {
            requests.push(FetchRequest {
                series_ids: chunk.to_vec(),
                start_year: span_start,
                end_year: span_end,
            });
        }
        span_start = span_end + 1;
    }
    requests
}
