use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::selection::SelectionError;

pub enum ApiError {
    NotFound(&'static str),
    Selection(SelectionError),
    CatalogPending,
    CatalogFailed(String),
}

impl From<SelectionError> for ApiError {
    fn from(e: SelectionError) -> Self {
        ApiError::Selection(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(what))).into_response()
            }
            ApiError::Selection(e @ SelectionError::UnknownObject(_)) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message("object_not_found", &e.to_string())),
            )
                .into_response(),
            ApiError::Selection(e @ SelectionError::CatalogNotLoaded) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::with_message("catalog_not_loaded", &e.to_string())),
            )
                .into_response(),
            ApiError::CatalogPending => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("catalog_pending")),
            )
                .into_response(),
            ApiError::CatalogFailed(reason) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("catalog_failed", &reason)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
