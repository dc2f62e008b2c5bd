//! Crate-wide error type.

use thiserror::Error;

/// Errors raised by the library outside of the proxy's caller-facing taxonomy.
///
/// Proxy outcomes that reach the HTTP caller are modelled by
/// [`crate::proxy::ProxyError`]; this type covers configuration, I/O and the
/// transport/storage collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream or network failure while talking to a remote host.
    #[error("{0}")]
    Provider(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // The Gemini URL carries the API key as a query parameter; never let
        // it leak into an error message.
        Error::Provider(e.without_url().to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
