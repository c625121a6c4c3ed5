//! Error types.
//!
//! Library components return typed errors (`FetchError`, `MalformedObservation`).
//! At the application boundary everything is folded into `AppError`, which
//! carries the process exit code:
//!
//! - `2`: configuration or local I/O
//! - `3`: data problems (corrupt store, malformed observation under `fail`)
//! - `4`: upstream fetch failures

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure of a batched upstream request. Either variant aborts the run.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Network, timeout, non-2xx status, or an undecodable body.
    #[error("BLS request failed: {0}")]
    Transport(String),

    /// Well-formed response whose status is not `REQUEST_SUCCEEDED`.
    #[error("BLS rejected the request ({status}): {}", .messages.join("; "))]
    UpstreamRejection { status: String, messages: Vec<String> },
}

/// A single data entry that could not be turned into an observation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed observation for {series_id} {year} {period}: {reason}")]
pub struct MalformedObservation {
    pub series_id: String,
    pub year: String,
    pub period: String,
    pub reason: String,
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl From<MalformedObservation> for AppError {
    fn from(err: MalformedObservation) -> Self {
        AppError::new(3, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_exit_code_4() {
        let err: AppError = FetchError::UpstreamRejection {
            status: "REQUEST_NOT_PROCESSED".to_string(),
            messages: vec!["daily threshold reached".to_string(), "try tomorrow".to_string()],
        }
        .into();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(
            err.to_string(),
            "BLS rejected the request (REQUEST_NOT_PROCESSED): daily threshold reached; try tomorrow"
        );
    }

    #[test]
    fn malformed_observation_maps_to_exit_code_3() {
        let err: AppError = MalformedObservation {
            series_id: "LNS14000000".to_string(),
            year: "2020".to_string(),
            period: "M04".to_string(),
            reason: "invalid value '-'".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("LNS14000000 2020 M04"));
    }
}
