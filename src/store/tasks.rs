use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{Action, Store};
use crate::catalog::{load_catalog, LoadTask};
use crate::clock::spawn_ticker;
use crate::propagate::ModelBuilder;

/// Load the catalog once in the background and publish the result.
///
/// A load cancelled before it finishes publishes nothing. A failed fetch is
/// published as [`Action::CatalogFailed`] and is not retried.
pub fn spawn_catalog_load<B>(
    store: Arc<Store>,
    task: LoadTask,
    builder: B,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    B: ModelBuilder + Send + 'static,
{
    tokio::spawn(async move {
        log::info!("Loading catalog from {}", task.source);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("Catalog load cancelled");
                return;
            }
            result = load_catalog(&task, builder) => result,
        };
        if cancel.is_cancelled() {
            return;
        }

        let action = match result {
            Ok(catalog) => {
                log::info!("Catalog ready with {} objects", catalog.len());
                Action::CatalogLoaded(catalog)
            }
            Err(e) => {
                log::error!("Catalog load from {} failed: {}", task.source, e);
                Action::CatalogFailed(e.to_string())
            }
        };
        if let Err(e) = store.dispatch(action) {
            log::warn!("Catalog result rejected: {}", e);
        }
    })
}

/// Owns the background producers feeding a [`Store`]: the one-time catalog
/// load and the clock ticker. Both stop when the runtime shuts down.
#[derive(Debug)]
pub struct Runtime {
    store: Arc<Store>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Runtime {
    pub fn start<B>(load: LoadTask, tick: Duration, builder: B) -> Self
    where
        B: ModelBuilder + Send + 'static,
    {
        let store = Arc::new(Store::new());
        let cancel = CancellationToken::new();
        let tasks = vec![
            spawn_ticker(store.clone(), tick, cancel.child_token()),
            spawn_catalog_load(store.clone(), load, builder, cancel.child_token()),
        ];
        Self {
            store,
            cancel,
            tasks,
        }
    }

    pub fn store(&self) -> Arc<Store> {
        self.store.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn shutdown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                log::warn!("Background task ended abnormally: {}", e);
            }
        }
        log::info!("Background tasks stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use crate::propagate::testing::{tle_text, FakeBuilder};
    use crate::propagate::PathSpec;
    use crate::store::CatalogState;
    use axum::{http::StatusCode, routing::get, Router};
    use chrono::Utc;
    use std::path::PathBuf;

    fn file_task(path: PathBuf) -> LoadTask {
        LoadTask {
            source: CatalogSource::File(path),
            timeout: Duration::from_secs(1),
            path: PathSpec::default(),
        }
    }

    fn write_catalog(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sat-globe-{tag}-{}.tle", std::process::id()));
        std::fs::write(&path, tle_text(&[("ISS (ZARYA)", 25544), ("NOAA 19", 33591)])).unwrap();
        path
    }

    fn url_task(url: String) -> LoadTask {
        LoadTask {
            source: CatalogSource::Url(url),
            timeout: Duration::from_secs(5),
            path: PathSpec::default(),
        }
    }

    /// Serve `body` with `status` on an ephemeral local port.
    async fn serve_catalog(status: StatusCode, body: String) -> String {
        let app = Router::new().route(
            "/active.tle",
            get(move || {
                let body = body.clone();
                async move { (status, body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/active.tle")
    }

    #[tokio::test]
    async fn publishes_catalog_fetched_over_http() {
        let body = tle_text(&[("ISS (ZARYA)", 25544), ("NOAA 19", 33591), ("DECAYED", 3)]);
        let url = serve_catalog(StatusCode::OK, body).await;
        let store = Arc::new(Store::new());
        spawn_catalog_load(
            store.clone(),
            url_task(url.clone()),
            FakeBuilder { now: Utc::now() },
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let snapshot = store.current();
        let catalog = snapshot.catalog.catalog().expect("catalog loaded");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.report.source, url);
        assert_eq!(catalog.report.skipped_count(), 1);
    }

    #[tokio::test]
    async fn http_error_status_publishes_failure() {
        let url = serve_catalog(StatusCode::SERVICE_UNAVAILABLE, "busy".into()).await;
        let store = Arc::new(Store::new());
        spawn_catalog_load(
            store.clone(),
            url_task(url),
            FakeBuilder { now: Utc::now() },
            CancellationToken::new(),
        )
        .await
        .unwrap();

        match &store.current().catalog {
            CatalogState::Failed(reason) => assert!(reason.contains("503"), "{reason}"),
            other => panic!("expected a failed load, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn publishes_loaded_catalog() {
        let path = write_catalog("publish");
        let store = Arc::new(Store::new());
        let handle = spawn_catalog_load(
            store.clone(),
            file_task(path.clone()),
            FakeBuilder { now: Utc::now() },
            CancellationToken::new(),
        );
        handle.await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let snapshot = store.current();
        assert_eq!(snapshot.catalog.objects().len(), 2);
    }

    #[tokio::test]
    async fn publishes_failure() {
        let store = Arc::new(Store::new());
        spawn_catalog_load(
            store.clone(),
            file_task(PathBuf::from("/nonexistent/active.tle")),
            FakeBuilder { now: Utc::now() },
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(matches!(store.current().catalog, CatalogState::Failed(_)));
    }

    #[tokio::test]
    async fn cancelled_load_publishes_nothing() {
        let path = write_catalog("cancel");
        let store = Arc::new(Store::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        spawn_catalog_load(
            store.clone(),
            file_task(path.clone()),
            FakeBuilder { now: Utc::now() },
            cancel,
        )
        .await
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(store.current().catalog, CatalogState::Pending));
    }

    #[tokio::test]
    async fn runtime_shutdown_stops_ticker() {
        let path = write_catalog("runtime");
        let runtime = Runtime::start(
            file_task(path.clone()),
            Duration::from_millis(10),
            FakeBuilder { now: Utc::now() },
        );
        let store = runtime.store();
        let mut rx = store.subscribe();

        // both producers publish independently; wait for both
        while store.current().clock.is_none() || store.current().catalog.catalog().is_none() {
            rx.changed().await.unwrap();
        }
        runtime.shutdown().await;
        std::fs::remove_file(&path).unwrap();

        let stopped_at = store.current().clock;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.current().clock, stopped_at);
    }
}
