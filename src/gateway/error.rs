use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::search::SearchError;

use super::STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, status_tag) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Search(e) => {
                let status = match e {
                    SearchError::EmptyDescription => StatusCode::BAD_REQUEST,
                    SearchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.code())
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static(status_tag));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
