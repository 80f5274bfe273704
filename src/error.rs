//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for fetch/merge/publish operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors surfaced by the core pipeline.
///
/// Per-domain `Network` errors are handled inside the resolver (skip and
/// warn); everything else bubbles up to the cycle driver, which logs and
/// waits for the next tick. `Permission` at startup is fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Cannot read/write the system hosts path with the current privileges.
    #[error("no read/write permission for {path}; re-run with sudo or as administrator")]
    Permission {
        /// The hosts path that was probed.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// DNS lookup failure, HTTP request failure, or an unexpected status.
    #[error("network: {0}")]
    Network(String),

    /// Fetched payload is missing the required sentinel structure.
    #[error("invalid hosts payload: {0}")]
    Validation(String),

    /// Local artifact/template/hosts read or write failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Malformed JSON domain list or artifact serialization failure.
    #[error("{context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Compose a `Network` error as `context: cause`.
    pub fn network(context: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        Self::Network(format!("{context}: {cause}"))
    }
}
