use thiserror::Error;

/// Failure of a single fetch attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error while downloading file: {reason}")]
    Network { reason: String },

    #[error("Download error: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Download timeout exceeded")]
    Timeout,
}

impl FetchError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self::HttpStatus { status, reason }
    }
}

/// Every route for one URL failed. Carries the direct attempt's failure, since the
/// alternate routes are workarounds and their errors rarely describe the real problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to download file: {direct}")]
pub struct AggregateFetchError {
    pub url: String,
    pub direct: FetchError,
    pub attempts: usize,
}
