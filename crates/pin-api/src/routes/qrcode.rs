//! # QR Code API
//!
//! PNG QR codes pointing at a record's pinned content. The plain variant
//! encodes an `ipfs://` URI; the gateway variant encodes an HTTPS gateway
//! URL for clients without native IPFS support.

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use pin_core::NftId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::qr;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/qrcode/:id", get(qrcode_ipfs))
        .route("/qrcode/gateway/:id", get(qrcode_gateway))
}

#[derive(Debug, Deserialize)]
struct GatewayParams {
    /// Gateway host, e.g. `dweb.link`.
    gateway: Option<String>,
}

#[utoipa::path(
    get,
    path = "/qrcode/{id}",
    params(("id" = String, Path, description = "NFT identifier")),
    responses(
        (status = 200, description = "PNG QR code encoding the record's ipfs:// URI", body = Vec<u8>, content_type = "image/png"),
        (status = 404, description = "No record with this id", body = crate::error::ErrorBody),
    ),
    tag = "qrcode"
)]
async fn qrcode_ipfs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    render_qr(&state, &id, None).await
}

#[utoipa::path(
    get,
    path = "/qrcode/gateway/{id}",
    params(
        ("id" = String, Path, description = "NFT identifier"),
        ("gateway" = Option<String>, Query, description = "Gateway host (default ipfs.io)"),
    ),
    responses(
        (status = 200, description = "PNG QR code encoding an HTTPS gateway URL", body = Vec<u8>, content_type = "image/png"),
        (status = 404, description = "No record with this id", body = crate::error::ErrorBody),
    ),
    tag = "qrcode"
)]
async fn qrcode_gateway(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<GatewayParams>,
) -> Result<Response, ApiError> {
    let gateway = params.gateway.unwrap_or_else(|| "ipfs.io".to_string());
    render_qr(&state, &id, Some(&gateway)).await
}

async fn render_qr(state: &AppState, id: &str, gateway: Option<&str>) -> Result<Response, ApiError> {
    let id = NftId::parse(id).map_err(|_| ApiError::NotFound(format!("NFT {id} not found")))?;
    let target = state.service.qr_target(&id, gateway).await?;
    let png = qr::encode_png(&target)
        .map_err(|e| ApiError::Internal(format!("QR rendering failed: {e}")))?;
    Ok(([(CONTENT_TYPE, "image/png")], png).into_response())
}
