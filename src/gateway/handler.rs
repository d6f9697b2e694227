use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::catalog::EntityTables;
use crate::search::ReferenceRequest;

use super::error::GatewayError;
use super::state::AppState;
use super::{RANKING_HEADER, REFINED_HEADER};

/// `POST /api/references`
#[instrument(skip_all)]
pub async fn references_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReferenceRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    debug!(
        description_len = request.description.len(),
        demo = request.demo_mode,
        "Reference search request"
    );

    let outcome = state.service.search(&request).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        RANKING_HEADER,
        HeaderValue::from_static(outcome.ranking.as_str()),
    );
    headers.insert(
        REFINED_HEADER,
        HeaderValue::from_static(if outcome.refined { "true" } else { "false" }),
    );

    Ok((StatusCode::OK, headers, Json(outcome.results)).into_response())
}

/// `GET /api/filters`
pub async fn filters_handler(State(state): State<AppState>) -> Json<EntityTables> {
    Json(state.service.tables().clone())
}
