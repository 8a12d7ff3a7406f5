use axum::{extract::State, response::IntoResponse};

use crate::store::CatalogState;
use crate::web::state::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.current();
    let status = match &snapshot.catalog {
        CatalogState::Pending => format!("Loading catalog from {}", state.config.catalog.source()),
        CatalogState::Failed(_) => "Catalog unavailable".to_string(),
        CatalogState::Loaded(catalog) => format!(
            "{} tracked, {} skipped",
            catalog.report.tracked_count(),
            catalog.report.skipped_count()
        ),
    };
    let scene = crate::scene::GlobeScene::compose(&snapshot, &state.style);

    DashboardTemplate {
        header: scene.header,
        clock: scene.clock,
        detail: scene.detail,
        paths: scene.paths,
        status,
    }
}
