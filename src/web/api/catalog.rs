use axum::{extract::State, Json};

use crate::catalog::LoadReport;
use crate::store::CatalogState;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/catalog/report",
    responses(
        (status = 200, description = "Per-entry outcome of the catalog load", body = LoadReport),
        (status = 502, description = "Catalog fetch failed", body = ErrorResponse),
        (status = 503, description = "Catalog still loading", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn report(State(state): State<AppState>) -> ApiResult<Json<LoadReport>> {
    let snapshot = state.store.current();
    match &snapshot.catalog {
        CatalogState::Pending => Err(ApiError::CatalogPending),
        CatalogState::Failed(reason) => Err(ApiError::CatalogFailed(reason.clone())),
        CatalogState::Loaded(catalog) => Ok(Json(catalog.report.clone())),
    }
}
