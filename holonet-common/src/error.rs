//! Common error types for Holonet

use thiserror::Error;

/// Common result type for Holonet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the aggregator
#[derive(Error, Debug)]
pub enum Error {
    /// Network failure or non-2xx answer from the remote source
    #[error("Fetch error for {url}: {message}")]
    Fetch {
        url: String,
        /// Upstream HTTP status, if a response was received
        status: Option<u16>,
        message: String,
    },

    /// Remote source did not answer within the configured timeout
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    /// Payload is missing `count`/`results` or other expected keys
    #[error("Unexpected shape: {0}")]
    UnexpectedShape(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised while talking to a remote endpoint
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Timeout { .. })
    }

    /// Upstream HTTP status carried by a fetch error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}
