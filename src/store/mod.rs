mod snapshot;
mod tasks;

use std::sync::Arc;

use tokio::sync::watch;

pub use snapshot::{Action, CatalogState, Snapshot};
pub use tasks::{spawn_catalog_load, Runtime};

use crate::selection::SelectionError;

/// Holds the latest [`Snapshot`] and applies actions to it.
///
/// Producers never mutate state directly: they dispatch actions, the reducer
/// builds a new snapshot and subscribers see the replacement.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<Arc<Snapshot>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(Snapshot::default()));
        Self { tx }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Apply `action`. Subscribers are only notified when the resulting
    /// snapshot differs; a rejected action leaves it untouched.
    pub fn dispatch(&self, action: Action) -> Result<Arc<Snapshot>, SelectionError> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|current| match current.reduce(action) {
            Ok(next) if next == **current => false,
            Ok(next) => {
                *current = Arc::new(next);
                true
            }
            Err(err) => {
                outcome = Err(err);
                false
            }
        });
        outcome.map(|()| self.current())
    }
}
