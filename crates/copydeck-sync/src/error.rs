//! Error types for the sync layer
//!
//! Provides error handling for:
//! - Local mirror reads/writes
//! - Remote fetch/push
//!
//! Stores never surface these to the operator; they are logged and dropped.
//! The traits return them so embedders and tests can see what happened.

use copydeck_core::DocumentKind;
use std::path::PathBuf;

/// Errors from the local mirror
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// IO error on a mirror file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mirror content is not a valid snapshot
    #[error("corrupt mirror entry '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl MirrorError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the remote document store
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Request could not be sent or the connection failed
    #[error("transport error for {kind}: {message}")]
    Transport { kind: DocumentKind, message: String },

    /// Remote answered with a non-success status
    #[error("remote returned status {status} for {kind}")]
    Status { kind: DocumentKind, status: u16 },

    /// Response body is not valid JSON
    #[error("undecodable response for {kind}: {message}")]
    Decode { kind: DocumentKind, message: String },

    /// Remote rejected the operation (in-memory stores, tests)
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Create transport error
    pub fn transport(kind: DocumentKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }
}

/// Combined sync error
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("mirror error: {0}")]
    Mirror(#[from] MirrorError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
