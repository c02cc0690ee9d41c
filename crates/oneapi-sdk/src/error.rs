//! Error types returned by the client library.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, OneApiError>;

/// Errors produced by the One API client.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum OneApiError {
    /// A builder argument was rejected.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// The client could not be constructed from the resolved configuration.
    #[error("{0}")]
    Configuration(String),

    /// The configuration file exists but could not be read or parsed.
    #[error("failed to load configuration from {}", path.display())]
    ConfigFile {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O or TOML error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success HTTP status.
    #[error("failed to get movie data: server returned {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },

    /// The request never produced a server response.
    #[error("failed to get movie data")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a body that is not the expected JSON.
    #[error("failed to decode movie data")]
    Decode(#[source] serde_json::Error),
}

impl OneApiError {
    /// Returns the HTTP status for `Api` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status } => Some(*status),
            _ => None,
        }
    }
}
