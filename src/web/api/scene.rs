use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::TrackedObject;
use crate::clock::format_clock;
use crate::scene::GlobeScene;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

const LONG_POLL: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockResponse {
    pub timestamp: Option<DateTime<Utc>>,
    pub display: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/scene",
    responses(
        (status = 200, description = "Composed globe scene", body = GlobeScene)
    ),
    tag = "scene"
)]
pub async fn get_scene(State(state): State<AppState>) -> Json<GlobeScene> {
    Json(state.scene())
}

/// Waits for the next published snapshot, or the long-poll timeout, and
/// returns the scene composed from whatever is current then.
#[utoipa::path(
    get,
    path = "/api/scene/next",
    responses(
        (status = 200, description = "Globe scene after the next state change", body = GlobeScene)
    ),
    tag = "scene"
)]
pub async fn next_scene(State(state): State<AppState>) -> Json<GlobeScene> {
    let mut rx = state.store.subscribe();
    if let Ok(Err(e)) = tokio::time::timeout(LONG_POLL, rx.changed()).await {
        log::debug!("Scene updates closed: {}", e);
    }
    Json(state.scene())
}

#[utoipa::path(
    get,
    path = "/api/clock",
    responses(
        (status = 200, description = "Latest clock tick", body = ClockResponse)
    ),
    tag = "scene"
)]
pub async fn get_clock(State(state): State<AppState>) -> Json<ClockResponse> {
    let clock = state.store.current().clock;
    Json(ClockResponse {
        timestamp: clock,
        display: clock.map(|t| format_clock(&t.with_timezone(&Local))),
    })
}

#[utoipa::path(
    get,
    path = "/api/objects",
    responses(
        (status = 200, description = "All tracked objects", body = Vec<TrackedObject>)
    ),
    tag = "objects"
)]
pub async fn list_objects(State(state): State<AppState>) -> Json<Vec<TrackedObject>> {
    let snapshot = state.store.current();
    Json(
        snapshot
            .catalog
            .objects()
            .iter()
            .map(|o| TrackedObject::clone(o))
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/api/objects/{id}",
    params(
        ("id" = u64, Path, description = "NORAD catalog number")
    ),
    responses(
        (status = 200, description = "Tracked object", body = TrackedObject),
        (status = 404, description = "Not tracked", body = ErrorResponse)
    ),
    tag = "objects"
)]
pub async fn get_object(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<TrackedObject>> {
    let snapshot = state.store.current();
    snapshot
        .catalog
        .catalog()
        .and_then(|c| c.get(id))
        .map(|o| Json(TrackedObject::clone(o)))
        .ok_or(ApiError::NotFound("object_not_found"))
}
