//! Filesystem-backed record store.

use std::path::{Path, PathBuf};

use pin_core::{NftId, NftRecord, RecordDoc};

use crate::error::StoreError;

const DATA_SUFFIX: &str = "_data.json";

/// A directory of per-record JSON files.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Open the store rooted at `root`, creating the directory if absent.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StoreError::Io {
                path: root.clone(),
                source,
            })?;
        tracing::debug!(root = %root.display(), "record store opened");
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn metadata_path(&self, id: &NftId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn data_path(&self, id: &NftId) -> PathBuf {
        self.root.join(format!("{id}{DATA_SUFFIX}"))
    }

    /// Persist a record: metadata document plus full record document.
    ///
    /// Plain overwrite on both files; any pre-existing files under the
    /// same id are replaced.
    pub async fn put(&self, record: &NftRecord) -> Result<(), StoreError> {
        let id = &record.nft_id;

        let metadata_json =
            serde_json::to_vec(&record.metadata_doc()).map_err(|source| StoreError::Encode {
                id: id.to_string(),
                source,
            })?;
        let record_json =
            serde_json::to_vec(&RecordDoc::from(record)).map_err(|source| StoreError::Encode {
                id: id.to_string(),
                source,
            })?;

        let metadata_path = self.metadata_path(id);
        tokio::fs::write(&metadata_path, metadata_json)
            .await
            .map_err(|source| StoreError::Io {
                path: metadata_path,
                source,
            })?;

        let data_path = self.data_path(id);
        tokio::fs::write(&data_path, record_json)
            .await
            .map_err(|source| StoreError::Io {
                path: data_path,
                source,
            })?;

        tracing::debug!(%id, "record persisted");
        Ok(())
    }

    /// Read a record by id.
    ///
    /// A missing file is `NotFound`; a file that fails to parse or
    /// violates the record invariants is `Malformed`.
    pub async fn get(&self, id: &NftId) -> Result<NftRecord, StoreError> {
        let path = self.data_path(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: id.to_string() });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        parse_record(&path, &bytes)
    }

    /// Enumerate every record in the store.
    ///
    /// Files that fail to parse are logged and skipped — a single corrupt
    /// entry must not take down listing. The returned sequence follows
    /// filesystem enumeration order; callers impose their own ordering.
    pub async fn scan_all(&self) -> Result<Vec<NftRecord>, StoreError> {
        let mut entries =
            tokio::fs::read_dir(&self.root)
                .await
                .map_err(|source| StoreError::Io {
                    path: self.root.clone(),
                    source,
                })?;

        let mut records = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(StoreError::Io {
                        path: self.root.clone(),
                        source,
                    })
                }
            };

            let path = entry.path();
            let is_data_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(DATA_SUFFIX));
            if !is_data_file {
                continue;
            }

            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record file");
                    continue;
                }
            };
            match parse_record(&path, &bytes) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping malformed record file");
                }
            }
        }

        Ok(records)
    }
}

fn parse_record(path: &Path, bytes: &[u8]) -> Result<NftRecord, StoreError> {
    let doc: RecordDoc = serde_json::from_slice(bytes).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    NftRecord::try_from(doc).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
