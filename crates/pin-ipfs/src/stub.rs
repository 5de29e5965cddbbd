//! Deterministic in-process storage stub.
//!
//! Stands in for a live IPFS node in tests: every add returns a fresh
//! fake CID, and connect/add failures can be switched on to exercise the
//! service-unavailable and internal-error paths.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{StorageClient, StorageSession};
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    counter: AtomicU64,
    fail_connect: bool,
    fail_add: bool,
    added: Mutex<Vec<(String, usize)>>,
}

/// In-memory [`StorageClient`] that mints `QmStub...` CIDs.
#[derive(Debug, Clone, Default)]
pub struct StubStorage {
    inner: Arc<Inner>,
}

impl StubStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub whose connect probe always fails.
    pub fn unreachable() -> Self {
        Self {
            inner: Arc::new(Inner {
                fail_connect: true,
                ..Inner::default()
            }),
        }
    }

    /// A stub that connects fine but fails every add.
    pub fn failing_adds() -> Self {
        Self {
            inner: Arc::new(Inner {
                fail_add: true,
                ..Inner::default()
            }),
        }
    }

    /// Every `(file_name, byte_length)` pair added so far, in order.
    pub fn added(&self) -> Vec<(String, usize)> {
        self.inner.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageClient for StubStorage {
    async fn connect(&self) -> Result<Box<dyn StorageSession>, StorageError> {
        if self.inner.fail_connect {
            return Err(StorageError::Unreachable {
                reason: "stub configured unreachable".into(),
            });
        }
        Ok(Box::new(StubSession {
            inner: Arc::clone(&self.inner),
        }))
    }
}

#[derive(Debug)]
struct StubSession {
    inner: Arc<Inner>,
}

#[async_trait]
impl StorageSession for StubSession {
    async fn add_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        if self.inner.fail_add {
            return Err(StorageError::Api {
                endpoint: "stub:/add".into(),
                status: 500,
                body: "stub configured to fail adds".into(),
            });
        }
        let n = self.inner.counter.fetch_add(1, Ordering::SeqCst);
        self.inner
            .added
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.len()));
        Ok(format!("QmStub{n:05}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn stub_mints_distinct_cids() {
        let stub = StubStorage::new();
        let session = stub.connect().await.unwrap();
        let a = session.add_bytes("a.bin", vec![1, 2, 3]).await.unwrap();
        let b = session.add_bytes("b.bin", vec![4]).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(stub.added(), vec![("a.bin".into(), 3), ("b.bin".into(), 1)]);
    }

    #[tokio::test]
    async fn unreachable_stub_fails_connect() {
        let err = StubStorage::unreachable().connect().await.unwrap_err();
        assert!(matches!(err, StorageError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn failing_stub_connects_but_rejects_adds() {
        let stub = StubStorage::failing_adds();
        let session = stub.connect().await.unwrap();
        let err = session.add_bytes("a.bin", vec![1]).await.unwrap_err();
        assert!(matches!(err, StorageError::Api { .. }));
    }

    #[tokio::test]
    async fn add_file_reads_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"abc").unwrap();

        let stub = StubStorage::new();
        let session = stub.connect().await.unwrap();
        let cid = session.add_file(tmp.path()).await.unwrap();
        assert!(cid.starts_with("QmStub"));
        assert_eq!(stub.added()[0].1, 3);
    }
}
