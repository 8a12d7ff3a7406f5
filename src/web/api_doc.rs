use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::scene::ClockResponse;
use super::api::selection::{SelectRequest, SelectionResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::scene::get_scene,
        super::api::scene::next_scene,
        super::api::scene::get_clock,
        super::api::scene::list_objects,
        super::api::scene::get_object,
        super::api::selection::select,
        super::api::selection::clear,
        super::api::catalog::report,
    ),
    components(
        schemas(
            crate::scene::GlobeScene,
            crate::scene::GlobeStyle,
            crate::scene::DirectionalLight,
            crate::scene::Marker,
            crate::scene::PathLayer,
            crate::scene::Header,
            crate::scene::DetailPanel,
            crate::propagate::PathWaypoint,
            crate::catalog::TrackedObject,
            crate::catalog::ObjectDetails,
            crate::catalog::LoadReport,
            crate::catalog::EntryReport,
            crate::catalog::EntryOutcome,
            crate::catalog::SkipReason,
            crate::selection::Selection,
            SelectRequest,
            SelectionResponse,
            ClockResponse,
            ErrorResponse,
        )
    ),
    info(
        title = "Sat-Globe API",
        description = "Live satellite positions, paths and selection for a 3D globe view",
        version = "0.1.0"
    ),
    tags(
        (name = "scene", description = "Composed render parameters"),
        (name = "objects", description = "Tracked objects"),
        (name = "selection", description = "Highlighted object"),
        (name = "catalog", description = "Catalog load outcome")
    )
)]
pub struct ApiDoc;
