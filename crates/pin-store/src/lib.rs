//! # pin-store — Local Record Store
//!
//! A directory of JSON files, two per issued record:
//!
//! - `{id}.json` — the standalone metadata document (the same bytes that
//!   are pinned to the storage network, kept for inspection/re-upload).
//! - `{id}_data.json` — the full record document, used for all reads.
//!
//! Writes are plain overwrites: no atomic rename, no fsync. A crash
//! mid-write can leave a corrupt file; corrupt files surface as read
//! failures on `get` and are logged and skipped on `scan_all`. The store
//! imposes no ordering — callers sort.
//!
//! The store directory is created lazily at [`RecordStore::open`]; that is
//! the only startup-time side effect of the whole service.

mod error;
mod store;

pub use error::StoreError;
pub use store::RecordStore;
