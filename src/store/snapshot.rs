use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, TrackedObject};
use crate::selection::{Selection, SelectionError};

#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    #[default]
    Pending,
    Loaded(Arc<Catalog>),
    Failed(String),
}

/// Loaded catalogs compare by identity; every load publishes a new one.
impl PartialEq for CatalogState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CatalogState::Pending, CatalogState::Pending) => true,
            (CatalogState::Loaded(a), CatalogState::Loaded(b)) => Arc::ptr_eq(a, b),
            (CatalogState::Failed(a), CatalogState::Failed(b)) => a == b,
            _ => false,
        }
    }
}

impl CatalogState {
    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            CatalogState::Loaded(catalog) => Some(catalog.as_ref()),
            _ => None,
        }
    }

    /// Tracked objects; empty unless a catalog has loaded.
    pub fn objects(&self) -> &[Arc<TrackedObject>] {
        self.catalog().map(Catalog::objects).unwrap_or_default()
    }
}

/// Everything the globe view is composed from, at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub catalog: CatalogState,
    pub selection: Selection,
    pub clock: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub enum Action {
    CatalogLoaded(Catalog),
    CatalogFailed(String),
    Tick(DateTime<Utc>),
    Select(u64),
    ClearSelection,
}

impl Snapshot {
    pub fn reduce(&self, action: Action) -> Result<Snapshot, SelectionError> {
        let mut next = self.clone();
        match action {
            Action::CatalogLoaded(catalog) => {
                // a selection only survives if the new catalog still has it
                if let Some(id) = next.selection.selected() {
                    if catalog.get(id).is_none() {
                        next.selection.clear();
                    }
                }
                next.catalog = CatalogState::Loaded(Arc::new(catalog));
            }
            Action::CatalogFailed(reason) => {
                next.catalog = CatalogState::Failed(reason);
                next.selection.clear();
            }
            Action::Tick(now) => next.clock = Some(now),
            Action::Select(id) => {
                let catalog = self
                    .catalog
                    .catalog()
                    .ok_or(SelectionError::CatalogNotLoaded)?;
                if catalog.get(id).is_none() {
                    return Err(SelectionError::UnknownObject(id));
                }
                next.selection.select(id);
            }
            Action::ClearSelection => {
                next.selection.clear();
            }
        }
        Ok(next)
    }

    pub fn selected_object(&self) -> Option<&Arc<TrackedObject>> {
        let id = self.selection.selected()?;
        self.catalog.catalog()?.get(id)
    }
}
