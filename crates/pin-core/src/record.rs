//! NFT records, metadata documents, and their wire encoding.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;
use crate::id::NftId;

/// The uploaded-content half of a record.
///
/// Exists only when a content file was uploaded. Pairing the CID with the
/// content type in one struct makes the co-occurrence invariant structural:
/// a record cannot carry a content CID without a content type or vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftContent {
    /// CID addressing the uploaded bytes on the storage network.
    pub cid: String,
    /// MIME type declared by the uploader.
    pub content_type: String,
}

impl NftContent {
    /// The `ipfs://` URI recorded as the metadata `image` field.
    pub fn image_uri(&self) -> String {
        format!("ipfs://{}", self.cid)
    }
}

/// The unit of persisted state: one issued NFT record.
///
/// Immutable once created; owned by the local record store. The metadata
/// CID is always present after a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftRecord {
    pub nft_id: NftId,
    /// CID of the metadata JSON document on the storage network.
    pub metadata_cid: String,
    pub name: String,
    pub description: String,
    /// Arbitrary key/value mappings, order preserved.
    pub attributes: Vec<serde_json::Value>,
    /// Present only when a content file was uploaded.
    pub content: Option<NftContent>,
}

impl NftRecord {
    /// CID of the uploaded content, if any.
    pub fn content_cid(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.cid.as_str())
    }

    /// Derive the metadata document that is pinned to IPFS.
    pub fn metadata_doc(&self) -> MetadataDoc {
        MetadataDoc {
            name: self.name.clone(),
            description: self.description.clone(),
            attributes: self.attributes.clone(),
            image: self.content.as_ref().map(NftContent::image_uri),
            content_type: self.content.as_ref().map(|c| c.content_type.clone()),
        }
    }

    /// The URI a QR code for this record should point at.
    ///
    /// Prefers the content CID and falls back to the metadata CID for
    /// metadata-only records. With a gateway host the URI is a plain
    /// HTTPS gateway link; without one it is a native `ipfs://` URI.
    pub fn qr_target(&self, gateway: Option<&str>) -> String {
        let cid = self.content_cid().unwrap_or(&self.metadata_cid);
        match gateway {
            Some(host) => format!("https://{host}/ipfs/{cid}"),
            None => format!("ipfs://{cid}"),
        }
    }
}

/// The descriptive metadata JSON document.
///
/// Stored both on IPFS and on local disk as `{id}.json`. The `image` and
/// `content_type` keys are omitted entirely for metadata-only records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetadataDoc {
    pub name: String,
    pub description: String,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub attributes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Flat wire/disk encoding of a record.
///
/// This is the shape written to `{id}_data.json` and returned from the
/// API. `content_cid` serializes as an explicit `null` for metadata-only
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordDoc {
    #[schema(value_type = String)]
    pub nft_id: NftId,
    pub content_cid: Option<String>,
    pub metadata_cid: String,
    pub metadata: MetadataDoc,
}

impl From<&NftRecord> for RecordDoc {
    fn from(record: &NftRecord) -> Self {
        Self {
            nft_id: record.nft_id.clone(),
            content_cid: record.content_cid().map(str::to_string),
            metadata_cid: record.metadata_cid.clone(),
            metadata: record.metadata_doc(),
        }
    }
}

/// Re-validate the content invariant when reading a record back.
///
/// A document that pairs a content CID with a missing content type (or
/// carries `image`/`content_type` without a content CID) is corrupt and
/// must surface as a read failure, not as a plausible-looking record.
impl TryFrom<RecordDoc> for NftRecord {
    type Error = DomainError;

    fn try_from(doc: RecordDoc) -> Result<Self, Self::Error> {
        let content = match doc.content_cid {
            Some(cid) => {
                let content_type = doc.metadata.content_type.ok_or_else(|| {
                    DomainError::ContentInvariant {
                        id: doc.nft_id.to_string(),
                        reason: "content_cid present but metadata.content_type missing".into(),
                    }
                })?;
                Some(NftContent { cid, content_type })
            }
            None => {
                if doc.metadata.image.is_some() || doc.metadata.content_type.is_some() {
                    return Err(DomainError::ContentInvariant {
                        id: doc.nft_id.to_string(),
                        reason: "content metadata present without a content_cid".into(),
                    });
                }
                None
            }
        };

        Ok(Self {
            nft_id: doc.nft_id,
            metadata_cid: doc.metadata_cid,
            name: doc.metadata.name,
            description: doc.metadata.description,
            attributes: doc.metadata.attributes,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_content() -> NftRecord {
        NftRecord {
            nft_id: NftId::generate(),
            metadata_cid: "QmMetaCid".into(),
            name: "Art1".into(),
            description: "d".into(),
            attributes: vec![serde_json::json!({"trait": "x"})],
            content: Some(NftContent {
                cid: "QmContentCid".into(),
                content_type: "image/png".into(),
            }),
        }
    }

    fn metadata_only_record() -> NftRecord {
        NftRecord {
            nft_id: NftId::generate(),
            metadata_cid: "QmMetaCid".into(),
            name: "Art0".into(),
            description: "d".into(),
            attributes: Vec::new(),
            content: None,
        }
    }

    #[test]
    fn metadata_doc_carries_image_for_content_records() {
        let doc = record_with_content().metadata_doc();
        assert_eq!(doc.image.as_deref(), Some("ipfs://QmContentCid"));
        assert_eq!(doc.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn metadata_doc_omits_content_keys_when_no_content() {
        let doc = metadata_only_record().metadata_doc();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("image"));
        assert!(!json.contains("content_type"));
    }

    #[test]
    fn record_doc_serializes_null_content_cid() {
        let doc = RecordDoc::from(&metadata_only_record());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["content_cid"].is_null());
    }

    #[test]
    fn record_doc_round_trips() {
        for record in [record_with_content(), metadata_only_record()] {
            let doc = RecordDoc::from(&record);
            let json = serde_json::to_string(&doc).unwrap();
            let parsed: RecordDoc = serde_json::from_str(&json).unwrap();
            let back = NftRecord::try_from(parsed).unwrap();
            assert_eq!(back, record);
        }
    }

    #[test]
    fn content_cid_without_content_type_is_rejected() {
        let mut doc = RecordDoc::from(&record_with_content());
        doc.metadata.content_type = None;
        let err = NftRecord::try_from(doc).unwrap_err();
        assert!(matches!(err, DomainError::ContentInvariant { .. }));
    }

    #[test]
    fn image_without_content_cid_is_rejected() {
        let mut doc = RecordDoc::from(&metadata_only_record());
        doc.metadata.image = Some("ipfs://QmOrphan".into());
        assert!(NftRecord::try_from(doc).is_err());
    }

    #[test]
    fn qr_target_prefers_content_cid() {
        let record = record_with_content();
        assert_eq!(record.qr_target(None), "ipfs://QmContentCid");
        assert_eq!(
            record.qr_target(Some("ipfs.io")),
            "https://ipfs.io/ipfs/QmContentCid"
        );
    }

    #[test]
    fn qr_target_falls_back_to_metadata_cid() {
        let record = metadata_only_record();
        assert_eq!(record.qr_target(None), "ipfs://QmMetaCid");
        assert_eq!(
            record.qr_target(Some("dweb.link")),
            "https://dweb.link/ipfs/QmMetaCid"
        );
    }
}
