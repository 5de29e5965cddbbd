//! # pin-core — Domain Types for the NFT Record Service
//!
//! The vocabulary shared by the store, the IPFS adapter, and the API:
//!
//! - [`NftId`] — server-generated record identifier, the sole lookup key.
//! - [`NftRecord`] — the unit of persisted state. Content presence is a
//!   tagged option ([`NftContent`]) so that the content CID and the
//!   `image`/`content_type` metadata fields cannot drift apart.
//! - [`MetadataDoc`] — the descriptive JSON document that is pinned to
//!   IPFS and mirrored on local disk.
//! - [`RecordDoc`] — the flat wire/disk encoding of a record. Converting
//!   a `RecordDoc` back into an [`NftRecord`] re-validates the content
//!   invariant, so a corrupt index file surfaces as a read failure rather
//!   than a silently malformed record.

pub mod error;
pub mod id;
pub mod record;

pub use error::DomainError;
pub use id::NftId;
pub use record::{MetadataDoc, NftContent, NftRecord, RecordDoc};
