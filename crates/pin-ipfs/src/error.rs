//! Storage network client error types.

use std::path::PathBuf;

/// Errors from storage network calls.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The connect probe failed — the node is down or the address is wrong.
    #[error("storage node unreachable: {reason}")]
    Unreachable { reason: String },

    /// HTTP transport error after a successful connect.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The node returned a non-2xx status.
    #[error("storage API {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Local file read failed before the bytes ever reached the wire.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
