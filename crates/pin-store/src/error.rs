//! Record store error types.

use std::path::PathBuf;

/// Errors from the local record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record file exists for this id.
    #[error("record {id} not found")]
    NotFound { id: String },

    /// Filesystem I/O failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but does not parse as a valid record. Distinct
    /// from `NotFound`: a corrupt index entry must not masquerade as a
    /// missing one.
    #[error("malformed record file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// Record serialization failed before anything was written.
    #[error("failed to encode record {id}: {source}")]
    Encode {
        id: String,
        source: serde_json::Error,
    },
}
