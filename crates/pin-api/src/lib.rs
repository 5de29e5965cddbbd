//! # pin-api — Axum HTTP service for pin-stack
//!
//! NFT records are created from multipart uploads: the content file (when
//! present) and a metadata JSON document are pinned to an IPFS node, and
//! the resulting record is persisted in a local JSON index. Reads are
//! served from the index alone.
//!
//! ## API Surface
//!
//! | Route                  | Module              | Purpose                        |
//! |------------------------|---------------------|--------------------------------|
//! | `POST /upload/`        | [`routes::nfts`]    | Create a record                |
//! | `GET /nft/{id}`        | [`routes::nfts`]    | Fetch one record               |
//! | `GET /nfts/`           | [`routes::nfts`]    | List all records               |
//! | `GET /qrcode/{id}`     | [`routes::qrcode`]  | QR code, `ipfs://` URI         |
//! | `GET /qrcode/gateway/{id}` | [`routes::qrcode`] | QR code, HTTPS gateway URL  |
//! | `GET /health`          | this module         | Liveness + IPFS reachability   |
//! | `GET /metrics`         | this module         | Prometheus scrape endpoint     |
//! | `GET /openapi.json`    | [`openapi`]         | Generated OpenAPI spec         |

pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod qr;
pub mod routes;
pub mod service;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `PIN_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything other
/// than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("PIN_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Body size limit: 2 MiB everywhere except the upload route, which
    // carries its own larger route-level limit.
    let mut api = Router::new()
        .merge(routes::nfts::router())
        .merge(routes::qrcode::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut ops = Router::new().route("/health", axum::routing::get(health));
    if metrics_on {
        ops = ops
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }
    let ops = ops.with_state(state);

    Router::new().merge(ops).merge(api)
}

/// Health probe response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving requests.
    pub status: String,
    /// `"connected"` or `"disconnected"`, from a live probe of the node.
    pub ipfs: String,
}

/// GET /health — liveness plus a best-effort IPFS reachability probe.
///
/// Responds 200 regardless of node state; an unreachable node is reported
/// in the body, not as an error.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ipfs = if state.service.probe_storage().await {
        "connected"
    } else {
        "disconnected"
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        ipfs: ipfs.to_string(),
    })
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates the record-count gauge on each scrape (pull model), then
/// gathers and encodes all metrics in text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    match state.service.list().await {
        Ok(records) => metrics.records_total().set(records.len() as f64),
        Err(e) => tracing::warn!(error = %e, "record count unavailable for metrics scrape"),
    }

    match metrics.gather_and_encode() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}
