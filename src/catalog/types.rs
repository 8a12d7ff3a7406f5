use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::report::LoadReport;
use crate::propagate::PathWaypoint;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ObjectDetails {
    pub history: String,
    pub scientists: String,
    pub physics: String,
}

impl Default for ObjectDetails {
    fn default() -> Self {
        Self {
            history: "Launched via heavy-lift rockets. Part of global infrastructure.".to_string(),
            scientists: "Built on principles by Newton & Kepler.".to_string(),
            physics: "In constant 'Free Fall' at 17,500 mph.".to_string(),
        }
    }
}

/// A catalog object positioned at load time.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrackedObject {
    /// NORAD catalog number.
    pub id: u64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Height above the ellipsoid in Earth radii.
    pub alt: f64,
    pub path: Vec<PathWaypoint>,
    pub details: ObjectDetails,
}

/// Immutable result of one catalog load.
#[derive(Debug, Clone)]
pub struct Catalog {
    objects: Vec<Arc<TrackedObject>>,
    index: HashMap<u64, usize>,
    pub report: LoadReport,
}

impl Catalog {
    pub fn new(objects: Vec<TrackedObject>, report: LoadReport) -> Self {
        let objects: Vec<_> = objects.into_iter().map(Arc::new).collect();
        let index = objects
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id, i))
            .collect();
        Self {
            objects,
            index,
            report,
        }
    }

    pub fn objects(&self) -> &[Arc<TrackedObject>] {
        &self.objects
    }

    pub fn get(&self, id: u64) -> Option<&Arc<TrackedObject>> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
