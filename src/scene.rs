use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::TrackedObject;
use crate::clock::format_clock;
use crate::propagate::PathWaypoint;
use crate::selection::{PathRule, Selection};
use crate::store::Snapshot;

pub const ACCENT_COLOR: &str = "#FFFF00";
pub const BASE_COLOR: &str = "#FFFFFF";
pub const MARKER_SIZE: f64 = 0.005;
pub const SELECTED_MARKER_SIZE: f64 = 0.015;
pub const PATH_STROKE: f64 = 2.0;
pub const TITLE: &str = "COMMAND CENTER";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct DirectionalLight {
    pub color: String,
    pub intensity: f64,
    pub position: [f64; 3],
}

/// Static globe appearance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct GlobeStyle {
    pub image_url: String,
    pub background_url: String,
    pub show_atmosphere: bool,
    pub atmosphere_color: String,
    pub atmosphere_altitude: f64,
    pub sun_light: DirectionalLight,
    pub ambient_light: String,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            image_url: "//unpkg.com/three-globe/example/img/earth-blue-marble.jpg".to_string(),
            background_url: "//unpkg.com/three-globe/example/img/night-sky.png".to_string(),
            show_atmosphere: true,
            atmosphere_color: "#87CEEB".to_string(),
            atmosphere_altitude: 0.25,
            sun_light: DirectionalLight {
                color: "#FFFFFF".to_string(),
                intensity: 2.5,
                position: [1.0, 1.0, 1.0],
            },
            ambient_light: "#333333".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneStyle {
    pub globe: GlobeStyle,
    pub paths: PathRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Marker {
    pub id: u64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
    pub size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PathLayer {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub stroke: f64,
    pub points: Vec<PathWaypoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Header {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DetailPanel {
    pub id: u64,
    pub name: String,
    pub scientists: String,
    pub physics: String,
}

/// Declarative view of a [`Snapshot`] that a globe renderer draws as is.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GlobeScene {
    pub globe: GlobeStyle,
    pub markers: Vec<Marker>,
    pub paths: Vec<PathLayer>,
    pub clock: Option<String>,
    pub header: Header,
    pub detail: Option<DetailPanel>,
}

impl GlobeScene {
    pub fn compose(snapshot: &Snapshot, style: &SceneStyle) -> Self {
        let objects = snapshot.catalog.objects();
        let selection = &snapshot.selection;

        let markers = objects.iter().map(|o| marker(o, selection)).collect();
        let paths = objects
            .iter()
            .filter(|o| style.paths.shows_path(selection, o))
            .map(|o| path_layer(o, selection))
            .collect();

        GlobeScene {
            globe: style.globe.clone(),
            markers,
            paths,
            clock: snapshot
                .clock
                .map(|t| format!("TIME: {}", format_clock(&t.with_timezone(&Local)))),
            header: Header {
                title: TITLE.to_string(),
                text: format!("Live tracking {} objects", objects.len()),
            },
            detail: snapshot.selected_object().map(|o| DetailPanel {
                id: o.id,
                name: o.name.clone(),
                scientists: o.details.scientists.clone(),
                physics: o.details.physics.clone(),
            }),
        }
    }
}

fn marker(object: &TrackedObject, selection: &Selection) -> Marker {
    let selected = selection.is_selected(object);
    Marker {
        id: object.id,
        name: object.name.clone(),
        lat: object.lat,
        lng: object.lng,
        alt: object.alt,
        size: if selected { SELECTED_MARKER_SIZE } else { MARKER_SIZE },
        color: if selected { ACCENT_COLOR } else { BASE_COLOR }.to_string(),
    }
}

fn path_layer(object: &TrackedObject, selection: &Selection) -> PathLayer {
    PathLayer {
        id: object.id,
        name: object.name.clone(),
        color: if selection.is_selected(object) {
            ACCENT_COLOR
        } else {
            BASE_COLOR
        }
        .to_string(),
        stroke: PATH_STROKE,
        points: object.path.clone(),
    }
}
