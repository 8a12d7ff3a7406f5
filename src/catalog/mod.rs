mod error;
mod loader;
mod parsing;
mod report;
mod types;

pub use loader::{build_catalog, load_catalog, CatalogSource, LoadTask, DEFAULT_CATALOG_URL};
pub use report::{EntryOutcome, EntryReport, LoadReport, SkipReason};
pub use types::{Catalog, ObjectDetails, TrackedObject};
