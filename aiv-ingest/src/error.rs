use thiserror::Error;

use crate::fetch::SourceKind;

/// Error type for aiv-ingest operations.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The primary API returned something that is not the expected JSON object.
    #[error("Invalid primary API payload: {0}")]
    PrimaryPayload(#[source] serde_json::Error),

    /// The localization service returned something that is not the expected JSON object.
    #[error("Invalid localization payload: {0}")]
    LocalizationPayload(#[source] serde_json::Error),
}

/// Error raised by a single source fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("{kind} answered HTTP {status} for {url}")]
    Status {
        kind: SourceKind,
        status: u16,
        url: String,
    },

    /// The request never got an answer (DNS, TLS, connection reset, ...).
    #[error("{kind} request to {url} failed: {message}")]
    Transport {
        kind: SourceKind,
        url: String,
        message: String,
    },
}

impl FetchError {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            FetchError::Status { kind, .. } | FetchError::Transport { kind, .. } => *kind,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { .. } => None,
        }
    }
}

/// Result type alias for aiv-ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
