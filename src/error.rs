//! Error types shared by the service layers.
//!
//! HTTP handlers wrap these in [`crate::http_server::AppError`] before they
//! reach a client.

/// Top-level error type for store, client and startup failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or unusable configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Contact store failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Language-model completion failed (transport, status, or body).
    #[error("completion error: {0}")]
    Completion(String),

    /// Outbound HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn completion(msg: impl Into<String>) -> Self {
        Self::Completion(msg.into())
    }
}
