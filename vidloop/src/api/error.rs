use thiserror::Error;

/**
    Errors from talking to the video API.

    Every variant counts as a network error for the caller: the request
    did not produce a usable answer.
*/
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("base URL '{0}' cannot carry a path")]
    InvalidBaseUrl(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("playback URL '{0}' is not an absolute URL")]
    InvalidPlaybackUrl(String),
}

impl ApiError {
    /// HTTP status of the response, if the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The listing endpoint answers 404 once nothing is left to list.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}
