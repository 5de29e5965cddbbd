//! Record Service — validation and orchestration for record lifecycle.
//!
//! The one place that touches both the storage network and the local
//! record store. Each operation is a single synchronous round trip: no
//! background work, no retries, and no state retained across requests.

use std::path::PathBuf;
use std::sync::Arc;

use pin_core::{MetadataDoc, NftContent, NftId, NftRecord};
use pin_ipfs::{StorageClient, StorageError};
use pin_store::{RecordStore, StoreError};

/// Input to [`RecordService::create`], decoded from the multipart form.
#[derive(Debug)]
pub struct NewNft {
    pub name: String,
    pub description: String,
    /// Raw JSON string from the `attributes` form field, if sent.
    pub attributes_json: Option<String>,
    /// Uploaded content file, if sent.
    pub file: Option<UploadedFile>,
}

/// An uploaded content file held in memory until it is staged to disk.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    /// MIME type declared by the client for the file part.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Failures from record service operations.
///
/// The variants deliberately mirror the HTTP taxonomy the endpoint layer
/// maps them to: validation, not-found, storage-unavailable, internal.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid attributes JSON format: {0}")]
    InvalidAttributes(serde_json::Error),

    #[error("NFT {0} not found")]
    NotFound(String),

    /// The storage node connect probe failed.
    #[error("IPFS connection failed: {0}")]
    StorageUnavailable(StorageError),

    /// An upload failed after a successful connect.
    #[error("storage upload failed: {0}")]
    Storage(StorageError),

    #[error(transparent)]
    Store(StoreError),

    #[error("failed to stage uploaded file: {0}")]
    Stage(std::io::Error),

    #[error("failed to encode metadata: {0}")]
    Encode(serde_json::Error),
}

/// Orchestrates create / lookup / listing / QR-target resolution.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<RecordStore>,
    storage: Arc<dyn StorageClient>,
    uploads_dir: PathBuf,
}

impl RecordService {
    pub fn new(
        store: Arc<RecordStore>,
        storage: Arc<dyn StorageClient>,
        uploads_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            storage,
            uploads_dir,
        }
    }

    /// Create a record: pin content (if any) and metadata to the storage
    /// network, then persist the record locally.
    ///
    /// Validation runs before anything touches the network or disk, so a
    /// bad `attributes` string leaves no trace. Any later failure aborts
    /// the whole create; the staging temp file is removed on every path
    /// by its drop guard, and the per-request storage session closes when
    /// it goes out of scope.
    pub async fn create(&self, input: NewNft) -> Result<NftRecord, ServiceError> {
        let attributes: Vec<serde_json::Value> = match &input.attributes_json {
            Some(raw) => serde_json::from_str(raw).map_err(ServiceError::InvalidAttributes)?,
            None => Vec::new(),
        };

        let nft_id = NftId::generate();

        let session = self
            .storage
            .connect()
            .await
            .map_err(ServiceError::StorageUnavailable)?;

        let content = match input.file {
            Some(file) => {
                let staged = tempfile::Builder::new()
                    .prefix(&format!("{nft_id}_"))
                    .tempfile_in(&self.uploads_dir)
                    .map_err(ServiceError::Stage)?;
                tokio::fs::write(staged.path(), &file.bytes)
                    .await
                    .map_err(ServiceError::Stage)?;

                let cid = session
                    .add_file(staged.path())
                    .await
                    .map_err(ServiceError::Storage)?;

                tracing::debug!(%nft_id, %cid, file_name = %file.file_name, "content pinned");
                Some(NftContent {
                    cid,
                    content_type: file
                        .content_type
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                })
            }
            None => None,
        };

        let metadata = MetadataDoc {
            name: input.name.clone(),
            description: input.description.clone(),
            attributes: attributes.clone(),
            image: content.as_ref().map(NftContent::image_uri),
            content_type: content.as_ref().map(|c| c.content_type.clone()),
        };
        let metadata_json = serde_json::to_vec(&metadata).map_err(ServiceError::Encode)?;
        let metadata_cid = session
            .add_bytes(&format!("{nft_id}.json"), metadata_json)
            .await
            .map_err(ServiceError::Storage)?;

        let record = NftRecord {
            nft_id,
            metadata_cid,
            name: input.name,
            description: input.description,
            attributes,
            content,
        };
        self.store.put(&record).await.map_err(ServiceError::Store)?;

        tracing::info!(nft_id = %record.nft_id, metadata_cid = %record.metadata_cid, "record created");
        Ok(record)
    }

    /// Look up a record by id.
    pub async fn get(&self, id: &NftId) -> Result<NftRecord, ServiceError> {
        self.store.get(id).await.map_err(|e| match e {
            StoreError::NotFound { id } => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        })
    }

    /// All records, sorted descending by name.
    pub async fn list(&self) -> Result<Vec<NftRecord>, ServiceError> {
        let mut records = self.store.scan_all().await.map_err(ServiceError::Store)?;
        sort_records(&mut records);
        Ok(records)
    }

    /// Resolve the URI a QR code for this record should encode.
    pub async fn qr_target(
        &self,
        id: &NftId,
        gateway: Option<&str>,
    ) -> Result<String, ServiceError> {
        let record = self.get(id).await?;
        Ok(record.qr_target(gateway))
    }

    /// Best-effort reachability probe of the storage node.
    pub async fn probe_storage(&self) -> bool {
        self.storage.connect().await.is_ok()
    }
}

/// Sort records descending by name. The sort is stable: records sharing
/// a name keep their relative order from the input sequence.
fn sort_records(records: &mut [NftRecord]) {
    records.sort_by(|a, b| b.name.cmp(&a.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pin_ipfs::stub::StubStorage;

    async fn service_with(stub: StubStorage) -> (RecordService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let metadata_dir = dir.path().join("metadata");
        let uploads_dir = dir.path().join("uploads");
        let store = RecordStore::open(&metadata_dir).await.unwrap();
        tokio::fs::create_dir_all(&uploads_dir).await.unwrap();
        let service = RecordService::new(Arc::new(store), Arc::new(stub), uploads_dir);
        (service, dir)
    }

    fn new_nft(name: &str, file: Option<UploadedFile>) -> NewNft {
        NewNft {
            name: name.into(),
            description: "d".into(),
            attributes_json: None,
            file,
        }
    }

    fn png_upload() -> UploadedFile {
        UploadedFile {
            file_name: "art.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn create_with_file_pins_content_then_metadata() {
        let stub = StubStorage::new();
        let (service, _dir) = service_with(stub.clone()).await;

        let record = service
            .create(new_nft("Art1", Some(png_upload())))
            .await
            .unwrap();

        let content = record.content.as_ref().expect("content expected");
        assert!(!content.cid.is_empty());
        assert_eq!(content.content_type, "image/png");
        assert_eq!(
            record.metadata_doc().image.as_deref(),
            Some(format!("ipfs://{}", content.cid).as_str())
        );

        // Two adds: the staged content file, then the metadata document.
        let added = stub.added();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].1, 3);
        assert_eq!(added[1].0, format!("{}.json", record.nft_id));
    }

    #[tokio::test]
    async fn create_without_file_pins_metadata_only() {
        let stub = StubStorage::new();
        let (service, _dir) = service_with(stub.clone()).await;

        let record = service.create(new_nft("Art0", None)).await.unwrap();

        assert!(record.content.is_none());
        assert!(!record.metadata_cid.is_empty());
        let metadata = record.metadata_doc();
        assert!(metadata.image.is_none());
        assert!(metadata.content_type.is_none());
        assert_eq!(stub.added().len(), 1);
    }

    #[tokio::test]
    async fn staging_file_is_removed_after_create() {
        let (service, dir) = service_with(StubStorage::new()).await;
        service
            .create(new_nft("Art1", Some(png_upload())))
            .await
            .unwrap();

        let mut uploads = std::fs::read_dir(dir.path().join("uploads")).unwrap();
        assert!(uploads.next().is_none(), "uploads dir should be empty");
    }

    #[tokio::test]
    async fn invalid_attributes_writes_nothing() {
        let stub = StubStorage::new();
        let (service, _dir) = service_with(stub.clone()).await;

        let err = service
            .create(NewNft {
                name: "Art1".into(),
                description: "d".into(),
                attributes_json: Some("{not json".into()),
                file: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidAttributes(_)));
        assert!(stub.added().is_empty(), "nothing should reach storage");
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attributes_must_be_a_sequence() {
        let (service, _dir) = service_with(StubStorage::new()).await;
        let err = service
            .create(NewNft {
                name: "Art1".into(),
                description: "d".into(),
                attributes_json: Some(r#"{"trait": "x"}"#.into()),
                file: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAttributes(_)));
    }

    #[tokio::test]
    async fn unreachable_storage_is_service_unavailable() {
        let (service, _dir) = service_with(StubStorage::unreachable()).await;
        let err = service.create(new_nft("Art1", None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::StorageUnavailable(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_add_leaves_no_record_and_no_staging_file() {
        let (service, dir) = service_with(StubStorage::failing_adds()).await;
        let err = service
            .create(new_nft("Art1", Some(png_upload())))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(service.list().await.unwrap().is_empty());

        let mut uploads = std::fs::read_dir(dir.path().join("uploads")).unwrap();
        assert!(uploads.next().is_none());
    }

    #[tokio::test]
    async fn get_after_create_returns_deep_equal_record() {
        let (service, _dir) = service_with(StubStorage::new()).await;
        let created = service
            .create(new_nft("Art1", Some(png_upload())))
            .await
            .unwrap();
        let fetched = service.get(&created.nft_id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (service, _dir) = service_with(StubStorage::new()).await;
        let err = service.get(&NftId::generate()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_sorts_descending_by_name() {
        let (service, _dir) = service_with(StubStorage::new()).await;
        service.create(new_nft("Art0", None)).await.unwrap();
        service.create(new_nft("Art1", None)).await.unwrap();

        let names: Vec<_> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Art1", "Art0"]);
    }

    #[tokio::test]
    async fn qr_target_uses_content_cid_with_fallback() {
        let (service, _dir) = service_with(StubStorage::new()).await;

        let with_file = service
            .create(new_nft("A", Some(png_upload())))
            .await
            .unwrap();
        let target = service.qr_target(&with_file.nft_id, None).await.unwrap();
        assert_eq!(target, format!("ipfs://{}", with_file.content_cid().unwrap()));

        let without_file = service.create(new_nft("B", None)).await.unwrap();
        let target = service
            .qr_target(&without_file.nft_id, Some("ipfs.io"))
            .await
            .unwrap();
        assert_eq!(
            target,
            format!("https://ipfs.io/ipfs/{}", without_file.metadata_cid)
        );
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let mk = |name: &str, desc: &str| NftRecord {
            nft_id: NftId::generate(),
            metadata_cid: "QmMeta".into(),
            name: name.into(),
            description: desc.into(),
            attributes: Vec::new(),
            content: None,
        };
        let mut records = vec![mk("Same", "first"), mk("Zed", "z"), mk("Same", "second")];
        sort_records(&mut records);

        let order: Vec<_> = records
            .iter()
            .map(|r| (r.name.as_str(), r.description.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("Zed", "z"), ("Same", "first"), ("Same", "second")]
        );
    }
}
