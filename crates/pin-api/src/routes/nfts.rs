//! # NFT Record API
//!
//! Endpoints for creating NFT records from multipart uploads and for
//! reading them back individually or as a listing.
//!
//! Creation is all-or-nothing: validation runs before any pinning, and a
//! failure at any stage leaves no record behind. Reads never touch the
//! storage network.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use pin_core::{NftId, RecordDoc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::service::{NewNft, UploadedFile};
use crate::state::AppState;

/// Uploads are staged in memory before hitting disk; cap them.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/upload/",
            post(upload_nft).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/nft/:id", get(get_nft))
        .route("/nfts/", get(list_nfts))
}

/// Multipart form accepted by `/upload/`. Documentation-only: the handler
/// walks the raw multipart stream.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Display name of the NFT.
    name: String,
    /// Free-form description.
    description: String,
    /// Optional JSON array of attribute objects.
    attributes: Option<String>,
    /// Optional content file to pin.
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
}

/// Response for the listing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NftListResponse {
    pub nfts: Vec<RecordDoc>,
    pub total_count: usize,
}

#[utoipa::path(
    post,
    path = "/upload/",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Record created", body = RecordDoc),
        (status = 400, description = "Missing field or malformed attributes", body = crate::error::ErrorBody),
        (status = 503, description = "IPFS node unreachable", body = crate::error::ErrorBody),
    ),
    tag = "nfts"
)]
async fn upload_nft(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RecordDoc>, ApiError> {
    let input = read_upload_form(multipart).await?;
    let record = state.service.create(input).await?;
    Ok(Json(RecordDoc::from(&record)))
}

/// Decode the multipart form into a [`NewNft`], rejecting incomplete input.
async fn read_upload_form(mut multipart: Multipart) -> Result<NewNft, ApiError> {
    let mut name = None;
    let mut description = None;
    let mut attributes_json = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        match field_name.as_str() {
            "name" => name = Some(read_text(field, "name").await?),
            "description" => description = Some(read_text(field, "description").await?),
            "attributes" => attributes_json = Some(read_text(field, "attributes").await?),
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read file field: {e}")))?
                    .to_vec();
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            // Unknown fields are ignored, matching lenient form handling.
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ApiError::BadRequest("field 'name' is required".into()))?;
    let description = description
        .ok_or_else(|| ApiError::BadRequest("field 'description' is required".into()))?;

    Ok(NewNft {
        name,
        description,
        attributes_json,
        file,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read field '{name}': {e}")))
}

#[utoipa::path(
    get,
    path = "/nft/{id}",
    params(("id" = String, Path, description = "NFT identifier")),
    responses(
        (status = 200, description = "Record found", body = RecordDoc),
        (status = 404, description = "No record with this id", body = crate::error::ErrorBody),
    ),
    tag = "nfts"
)]
async fn get_nft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordDoc>, ApiError> {
    // Ids that fail validation cannot name any stored record.
    let id = NftId::parse(&id).map_err(|_| ApiError::NotFound(format!("NFT {id} not found")))?;
    let record = state.service.get(&id).await?;
    Ok(Json(RecordDoc::from(&record)))
}

#[utoipa::path(
    get,
    path = "/nfts/",
    responses(
        (status = 200, description = "All records, sorted descending by name", body = NftListResponse),
    ),
    tag = "nfts"
)]
async fn list_nfts(State(state): State<AppState>) -> Result<Json<NftListResponse>, ApiError> {
    let records = state.service.list().await?;
    let nfts: Vec<RecordDoc> = records.iter().map(RecordDoc::from).collect();
    let total_count = nfts.len();
    Ok(Json(NftListResponse { nfts, total_count }))
}
