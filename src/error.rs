//! Error types for wp-fingerprint

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fingerprinting a target
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid URL provided
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to create HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// A single fetch failed (network, DNS, TLS, or timeout).
    /// Recovered per probe; never aborts a run.
    #[error("request failed: {0}")]
    Transport(String),

    /// Gzip-encoded body could not be decompressed
    #[error("gzip decompression failed: {0}")]
    Gzip(#[source] std::io::Error),

    /// Body is not valid UTF-8 after any decompression
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The root page HTML could not be acquired at all; fatal, no report
    #[error("could not acquire page HTML: {0}")]
    Acquisition(String),

    /// The headless rendering collaborator failed.
    /// Fatal only when the rendered strategy was selected.
    #[error("browser rendering failed: {0}")]
    Browser(String),

    /// Invalid output format specified
    #[error("invalid output format: '{0}' (valid: human, json, none)")]
    InvalidOutputFormat(String),

    /// Output operation failed
    #[error("output failed: {0}")]
    OutputFailed(#[source] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed")]
    SerializationFailed(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means "content unreadable" as opposed to a
    /// transport fault or a missing signal.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Gzip(_) | Self::Utf8(_))
    }
}
