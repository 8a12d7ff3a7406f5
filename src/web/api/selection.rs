use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::selection::Selection;
use crate::store::Action;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    /// NORAD catalog number of the object to highlight.
    pub id: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectionResponse {
    pub selection: Selection,
}

#[utoipa::path(
    put,
    path = "/api/selection",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Object selected", body = SelectionResponse),
        (status = 404, description = "Unknown object", body = ErrorResponse),
        (status = 409, description = "Catalog not loaded", body = ErrorResponse)
    ),
    tag = "selection"
)]
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Json<SelectionResponse>> {
    let snapshot = state.store.dispatch(Action::Select(request.id))?;
    log::debug!("Selected {}", request.id);
    Ok(Json(SelectionResponse {
        selection: snapshot.selection,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/selection",
    responses(
        (status = 200, description = "Selection cleared", body = SelectionResponse)
    ),
    tag = "selection"
)]
pub async fn clear(State(state): State<AppState>) -> ApiResult<Json<SelectionResponse>> {
    let snapshot = state.store.dispatch(Action::ClearSelection)?;
    Ok(Json(SelectionResponse {
        selection: snapshot.selection,
    }))
}
