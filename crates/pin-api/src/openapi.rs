//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pin-stack API",
        version = "0.3.2",
        description = "Content-addressed NFT record service.\n\nMultipart uploads are pinned to an IPFS node, metadata documents are pinned alongside them, and a local JSON index serves lookups, listings, and QR codes.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:7070", description = "Local development server"),
    ),
    paths(
        crate::routes::nfts::upload_nft,
        crate::routes::nfts::get_nft,
        crate::routes::nfts::list_nfts,
        crate::routes::qrcode::qrcode_ipfs,
        crate::routes::qrcode::qrcode_gateway,
    ),
    components(schemas(
        pin_core::RecordDoc,
        pin_core::MetadataDoc,
        crate::routes::nfts::UploadForm,
        crate::routes::nfts::NftListResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "nfts", description = "NFT record creation, lookup, and listing"),
        (name = "qrcode", description = "QR codes pointing at pinned content"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_all_paths() {
        let spec = ApiDoc::openapi();
        let paths = &spec.paths.paths;
        for expected in [
            "/upload/",
            "/nft/{id}",
            "/nfts/",
            "/qrcode/{id}",
            "/qrcode/gateway/{id}",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }

    #[test]
    fn spec_serializes_to_json() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("pin-stack API"));
    }
}
