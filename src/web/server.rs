use axum::{
    routing::{get, put},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::propagate::Sgp4Builder;
use crate::store::Runtime;

use super::api::catalog as catalog_handlers;
use super::api::scene as scene_handlers;
use super::api::selection as selection_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;
use super::ui::handlers as ui_handlers;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        // Scene API endpoints
        .route("/api/scene", get(scene_handlers::get_scene))
        .route("/api/scene/next", get(scene_handlers::next_scene))
        .route("/api/clock", get(scene_handlers::get_clock))
        .route("/api/objects", get(scene_handlers::list_objects))
        .route("/api/objects/{id}", get(scene_handlers::get_object))
        // Selection API endpoints
        .route(
            "/api/selection",
            put(selection_handlers::select).delete(selection_handlers::clear),
        )
        // Catalog API endpoints
        .route("/api/catalog/report", get(catalog_handlers::report))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let load = config
        .load_task()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let runtime = Runtime::start(load, config.clock.tick, Sgp4Builder);
    let state = AppState::new(config, runtime.store());
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(runtime.cancel_token()))
        .await;

    runtime.shutdown().await;
    served
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("Failed to listen for ctrl-c: {}", e);
            }
            log::info!("Shutting down");
        }
        _ = cancel.cancelled() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_catalog, Catalog};
    use crate::propagate::testing::{tle_text, FakeBuilder};
    use crate::propagate::PathSpec;
    use crate::store::{Action, Store};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn catalog() -> Catalog {
        let now = Utc::now();
        build_catalog(
            &tle_text(&[("ALPHA", 1), ("BRAVO", 2), ("ISS (ZARYA)", 25544)]),
            &FakeBuilder { now },
            now,
            &PathSpec::default(),
            "test".to_string(),
        )
    }

    fn state(loaded: bool) -> AppState {
        let store = Arc::new(Store::new());
        if loaded {
            store.dispatch(Action::CatalogLoaded(catalog())).unwrap();
        }
        AppState::new(Config::default(), store)
    }

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn scene_reflects_selection_changes() {
        let state = state(true);

        let (status, scene) = call(&state, "GET", "/api/scene", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scene["header"]["text"], "Live tracking 3 objects");
        assert_eq!(scene["paths"].as_array().unwrap().len(), 1);
        assert!(scene["detail"].is_null());

        let (status, _) = call(&state, "PUT", "/api/selection", Some(r#"{"id":1}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&state, "PUT", "/api/selection", Some(r#"{"id":2}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["selected"], 2);

        let (_, scene) = call(&state, "GET", "/api/scene", None).await;
        assert_eq!(scene["detail"]["name"], "BRAVO");
        let path_ids: Vec<_> = scene["paths"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_u64().unwrap())
            .collect();
        assert_eq!(path_ids, vec![2, 25544]);

        let (status, _) = call(&state, "DELETE", "/api/selection", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, scene) = call(&state, "GET", "/api/scene", None).await;
        assert!(scene["detail"].is_null());
        assert_eq!(scene["paths"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_selection_is_not_found() {
        let state = state(true);
        let (status, body) = call(&state, "PUT", "/api/selection", Some(r#"{"id":404}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "object_not_found");
    }

    #[tokio::test]
    async fn selection_before_load_conflicts() {
        let state = state(false);
        let (status, body) = call(&state, "PUT", "/api/selection", Some(r#"{"id":1}"#)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "catalog_not_loaded");
    }

    #[tokio::test]
    async fn objects_and_report() {
        let state = state(true);

        let (status, objects) = call(&state, "GET", "/api/objects", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(objects.as_array().unwrap().len(), 3);

        let (status, object) = call(&state, "GET", "/api/objects/25544", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(object["name"], "ISS (ZARYA)");
        assert_eq!(object["path"].as_array().unwrap().len(), 20);

        let (status, _) = call(&state, "GET", "/api/objects/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, report) = call(&state, "GET", "/api/catalog/report", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["entries"][0]["outcome"]["status"], "tracked");
    }

    #[tokio::test]
    async fn report_reflects_load_state() {
        let state = state(false);
        let (status, _) = call(&state, "GET", "/api/catalog/report", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        state
            .store
            .dispatch(Action::CatalogFailed("HTTP status server error (503)".into()))
            .unwrap();
        let (status, body) = call(&state, "GET", "/api/catalog/report", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "catalog_failed");
    }

    #[tokio::test]
    async fn next_scene_waits_for_change() {
        let state = state(true);
        let ticker = state.clone();
        let (response, ()) = tokio::join!(call(&state, "GET", "/api/scene/next", None), async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            ticker.store.dispatch(Action::Tick(Utc::now())).unwrap();
        });
        let (status, scene) = response;
        assert_eq!(status, StatusCode::OK);
        assert!(scene["clock"].as_str().unwrap().starts_with("TIME: "));
    }

    #[tokio::test]
    async fn clock_and_dashboard() {
        let state = state(true);
        let (_, clock) = call(&state, "GET", "/api/clock", None).await;
        assert!(clock["display"].is_null());

        state.store.dispatch(Action::Tick(Utc::now())).unwrap();
        let (_, clock) = call(&state, "GET", "/api/clock", None).await;
        assert!(clock["display"].as_str().unwrap().ends_with('M'));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("COMMAND CENTER"));
        assert!(html.contains("Live tracking 3 objects"));
    }
}
