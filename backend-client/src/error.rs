use reqwest::StatusCode;
use thiserror::Error;

/// Why a backend request failed. The UI collapses every variant into a
/// single "request failed" outcome; the detail is kept for logging.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request to {endpoint} could not complete: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {body}")]
    Server {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("malformed response from {endpoint}: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url for {endpoint}: {source}")]
    InvalidUrl {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Server { status, .. } => Some(*status),
            RequestError::Network { source, .. } => source.status(),
            RequestError::Parse { .. } | RequestError::InvalidUrl { .. } => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            RequestError::Network { endpoint, .. }
            | RequestError::Server { endpoint, .. }
            | RequestError::Parse { endpoint, .. }
            | RequestError::InvalidUrl { endpoint, .. } => endpoint,
        }
    }
}
