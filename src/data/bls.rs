//! BLS public time-series API (v2) integration.
//!
//! One POST fetches many series over a closed year range. The client only
//! transports and validates the envelope; turning payloads into observations is
//! `data::rows`' job.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, FetchError};

pub const DEFAULT_API_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
pub const API_KEY_ENV: &str = "BLS_API_KEY";

const STATUS_OK: &str = "REQUEST_SUCCEEDED";
const ERROR_BODY_PREVIEW: usize = 200;

/// One batched request: every listed series over `[start_year, end_year]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub series_ids: Vec<String>,
    pub start_year: i32,
    pub end_year: i32,
}

/// Anything that can answer a batched time-series request.
pub trait TimeSeriesSource {
    fn fetch(&self, request: &FetchRequest) -> Result<RawBatchResponse, FetchError>;

    /// Registered callers get higher per-request ceilings.
    fn has_api_key(&self) -> bool;
}

/// Decoded response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBatchResponse {
    pub status: String,
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results", default)]
    pub results: Option<BatchResults>,
}

impl RawBatchResponse {
    pub fn series(&self) -> &[SeriesPayload] {
        self.results.as_ref().map(|r| r.series.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchResults {
    #[serde(default)]
    pub series: Vec<SeriesPayload>,
}

/// Raw data for a single series.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesPayload {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataEntry {
    pub year: RawScalar,
    pub period: String,
    pub value: RawScalar,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
}

/// BLS sends years and values as strings; test fixtures and mirrors often use numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(serde_json::Number),
}

impl RawScalar {
    pub fn as_text(&self) -> String {
        match self {
            RawScalar::Text(s) => s.trim().to_string(),
            RawScalar::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        RawScalar::Text(value.to_string())
    }
}

/// Footnote attached to a data point (`P` = preliminary, etc.). Often `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Footnote {
    pub code: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    seriesid: &'a [String],
    startyear: String,
    endyear: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrationkey: Option<&'a str>,
}

pub struct BlsClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl BlsClient {
    pub fn new(url: impl Into<String>, timeout: Duration, api_key: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }

    /// Build a client, picking up `BLS_API_KEY` from the environment (or `.env`).
    ///
    /// A missing key is fine: the API still answers, with lower limits.
    pub fn from_env(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            info!("{API_KEY_ENV} not set; using unregistered rate limits");
        }
        Self::new(url, timeout, api_key)
    }
}

impl TimeSeriesSource for BlsClient {
    fn fetch(&self, request: &FetchRequest) -> Result<RawBatchResponse, FetchError> {
        let body = request_body(request, self.api_key.as_deref());
        debug!(
            series = request.series_ids.len(),
            start_year = request.start_year,
            end_year = request.end_year,
            "posting BLS request"
        );

        let resp = self.client.post(&self.url).json(&body).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!("timed out: {e}"))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP {status}: {}",
                preview(&text, ERROR_BODY_PREVIEW)
            )));
        }

        decode_response(&text)
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn request_body<'a>(request: &'a FetchRequest, api_key: Option<&'a str>) -> RequestBody<'a> {
    RequestBody {
        seriesid: &request.series_ids,
        startyear: request.start_year.to_string(),
        endyear: request.end_year.to_string(),
        registrationkey: api_key,
    }
}

/// Decode a response body and check its status field.
pub fn decode_response(body: &str) -> Result<RawBatchResponse, FetchError> {
    let decoded: RawBatchResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::Transport(format!(
            "failed to parse response ({e}): {}",
            preview(body, ERROR_BODY_PREVIEW)
        ))
    })?;

    if decoded.status != STATUS_OK {
        return Err(FetchError::UpstreamRejection {
            status: decoded.status,
            messages: decoded.message,
        });
    }

    Ok(decoded)
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
