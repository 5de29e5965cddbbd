//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use pin_ipfs::StorageClient;
use pin_store::RecordStore;

use crate::service::RecordService;

/// State shared across request handlers.
///
/// The store and storage client are injected here once at startup; no
/// handler reaches for process-wide singletons. Nothing in this state is
/// mutable in memory — the filesystem is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub service: RecordService,
}

impl AppState {
    pub fn new(
        store: Arc<RecordStore>,
        storage: Arc<dyn StorageClient>,
        uploads_dir: PathBuf,
    ) -> Self {
        Self {
            service: RecordService::new(store, storage, uploads_dir),
        }
    }
}
