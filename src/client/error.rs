use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-2xx response from the API. Code 0 means the request failed
    /// without an HTTP response (e.g. connection refused).
    #[error("API Error {code}: {message}")]
    Api { code: u16, message: String },

    #[error("Rate limit exceeded (retry after {retry_after}s): {message}")]
    RateLimit { retry_after: u64, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
