use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::TrackedObject;

pub const DEFAULT_PINNED_PATH: &str = "ISS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no tracked object with catalog number {0}")]
    UnknownObject(u64),
    #[error("catalog not loaded")]
    CatalogNotLoaded,
}

/// At most one highlighted object, keyed by catalog number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Selection {
    selected: Option<u64>,
}

impl Selection {
    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    /// Replace the current selection, returning the previous one.
    pub fn select(&mut self, id: u64) -> Option<u64> {
        self.selected.replace(id)
    }

    pub fn clear(&mut self) -> Option<u64> {
        self.selected.take()
    }

    pub fn is_selected(&self, object: &TrackedObject) -> bool {
        self.selected == Some(object.id)
    }
}

/// Decides which objects have their path drawn.
///
/// The selected object always does; so does any object whose name contains
/// one of the pinned substrings, whatever the selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PathRule {
    pub pinned: Vec<String>,
}

impl Default for PathRule {
    fn default() -> Self {
        Self {
            pinned: vec![DEFAULT_PINNED_PATH.to_string()],
        }
    }
}

impl PathRule {
    pub fn is_pinned(&self, object: &TrackedObject) -> bool {
        self.pinned.iter().any(|p| object.name.contains(p.as_str()))
    }

    pub fn shows_path(&self, selection: &Selection, object: &TrackedObject) -> bool {
        selection.is_selected(object) || self.is_pinned(object)
    }
}
