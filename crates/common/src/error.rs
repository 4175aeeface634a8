use thiserror::Error;

#[derive(Debug, Error)]
pub enum CuratorError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("POST request requires a non-empty form payload")]
    MissingPayload,

    #[error("{source_name} returned error {code}: {message}")]
    Upstream {
        source_name: &'static str,
        code: String,
        message: String,
    },

    #[error("{source_name} returned a malformed response: {body}")]
    MalformedResponse {
        source_name: &'static str,
        body: String,
    },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Scheduled time must be a 10-digit epoch timestamp in seconds, got {0}")]
    InvalidTimestamp(i64),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("{hours} posting hours configured but {articles} articles requested")]
    PostingHoursMismatch { hours: usize, articles: usize },
}

pub type CuratorResult<T> = Result<T, CuratorError>;
