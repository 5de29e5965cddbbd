//! # pin-ipfs — Storage Client Adapter
//!
//! Thin client for the content-addressed storage network (an IPFS node
//! speaking the `/api/v0` HTTP API). The consumed contract is minimal:
//! "add bytes-or-file, get back a CID string."
//!
//! ## Connection model
//!
//! One [`StorageSession`] per operation — [`StorageClient::connect`] builds
//! a fresh HTTP client with an explicit request timeout and probes the node,
//! and the session is dropped (closing the transport) on every exit path.
//! No pooling, no reuse across requests, no retries: a single failed add
//! fails the whole calling request.
//!
//! A failed probe is reported as [`StorageError::Unreachable`] so callers
//! can map it to a service-unavailable condition; it is never fatal to the
//! process.

pub mod client;
pub mod error;
pub mod stub;

pub use client::{IpfsApi, IpfsConfig, StorageClient, StorageSession};
pub use error::StorageError;
