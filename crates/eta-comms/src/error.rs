use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommsError {
    #[error("no API key configured for the live generator")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generator returned no content")]
    EmptyResponse,

    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

pub type CommsResult<T> = Result<T, CommsError>;
