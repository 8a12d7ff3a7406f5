use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("catalog read failed for {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog build task failed: {0}")]
    Build(#[from] tokio::task::JoinError),
}
