//! Domain validation errors.

/// Errors raised when domain invariants are violated at a trust boundary
/// (deserialization, id parsing).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// The identifier is empty or contains characters that could never
    /// appear in a server-generated id.
    #[error("invalid nft id {0:?}")]
    InvalidId(String),

    /// A record document pairs a content CID with missing content
    /// metadata, or carries content metadata without a content CID.
    #[error("record {id} violates the content invariant: {reason}")]
    ContentInvariant { id: String, reason: String },
}
