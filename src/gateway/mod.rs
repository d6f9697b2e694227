//! HTTP gateway (Axum) for reference search.
//!
//! Routes:
//! - `POST /api/references`: run a search
//! - `GET /api/filters`: enumerated filter values
//! - `GET /healthz`, `GET /ready`: liveness and readiness

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{filters_handler, references_handler};
pub use state::AppState;

use crate::provider::ProviderKind;

/// Response header carrying a short status tag.
pub const STATUS_HEADER: &str = "x-refsearch-status";
/// Stage that produced the ranking: `demo`, `none`, a provider name or `keyword`.
pub const RANKING_HEADER: &str = "x-refsearch-ranking";
/// `true` when refinement applied.
pub const REFINED_HEADER: &str = "x-refsearch-refined";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/filters", get(filters_handler))
        .route("/api/references", post(references_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub references: usize,
    pub approved: usize,
    pub providers: Vec<ProviderKind>,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Ready once at least one approved reference is loaded. Providers are optional: the
/// keyword fallback serves searches without them.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let store = state.service.store();
    let approved = store.approved_count();
    let is_ready = approved > 0;

    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            references: store.len(),
            approved,
            providers: state.service.providers().kinds(),
        }),
    )
        .into_response()
}
