use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::error::CatalogError;
use super::parsing::{split_triplets, Triplet};
use super::report::{EntryOutcome, EntryReport, LoadReport, SkipReason};
use super::types::{Catalog, ObjectDetails, TrackedObject};
use crate::propagate::{locate, ModelBuilder, OrbitModel, PathSampler, PathSpec, TleLines};

pub const DEFAULT_CATALOG_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=tle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Url(url) => write!(f, "{url}"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything needed to load a catalog once.
#[derive(Debug, Clone)]
pub struct LoadTask {
    pub source: CatalogSource,
    pub timeout: Duration,
    pub path: PathSpec,
}

/// Read the raw catalog text. One attempt, no retry.
pub async fn fetch_catalog(source: &CatalogSource, timeout: Duration) -> Result<String, CatalogError> {
    match source {
        CatalogSource::Url(url) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let text = client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            Ok(text)
        }
        CatalogSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogError::Read {
                    path: path.display().to_string(),
                    source,
                })
        }
    }
}

/// Fetch the catalog and position every entry at the current time.
///
/// Propagation runs on the blocking pool since a full catalog is tens of
/// thousands of SGP4 evaluations.
pub async fn load_catalog<B>(task: &LoadTask, builder: B) -> Result<Catalog, CatalogError>
where
    B: ModelBuilder + Send + 'static,
{
    let text = fetch_catalog(&task.source, task.timeout).await?;
    log::debug!("Fetched {} bytes from {}", text.len(), task.source);

    let source = task.source.to_string();
    let spec = task.path;
    let catalog = tokio::task::spawn_blocking(move || {
        build_catalog(&text, &builder, Utc::now(), &spec, source)
    })
    .await?;
    Ok(catalog)
}

/// Turn catalog text into tracked objects. Every complete triplet yields
/// exactly one report entry; failures never abort the rest of the load.
pub fn build_catalog<B: ModelBuilder>(
    text: &str,
    builder: &B,
    now: DateTime<Utc>,
    spec: &PathSpec,
    source: String,
) -> Catalog {
    let split = split_triplets(text);
    let mut objects = Vec::with_capacity(split.triplets.len());
    let mut entries = Vec::with_capacity(split.triplets.len());
    let mut seen_ids = HashSet::new();

    for triplet in &split.triplets {
        let outcome = match track(triplet, builder, now, spec, &seen_ids) {
            Ok(object) => {
                seen_ids.insert(object.id);
                let id = object.id;
                objects.push(object);
                EntryOutcome::Tracked { id }
            }
            Err(reason) => {
                log::debug!(
                    "Skipping '{}' at line {}: {} ({})",
                    triplet.name,
                    triplet.line,
                    reason,
                    reason.detail()
                );
                EntryOutcome::Skipped { reason }
            }
        };
        entries.push(EntryReport {
            line: triplet.line,
            name: triplet.name.to_string(),
            outcome,
        });
    }

    if split.trailing_lines > 0 {
        log::debug!("Ignoring {} trailing catalog lines", split.trailing_lines);
    }

    let duplicate_names = duplicate_names(&objects);
    if !duplicate_names.is_empty() {
        log::warn!(
            "{} names are shared by several objects; selection uses catalog numbers",
            duplicate_names.len()
        );
    }

    let report = LoadReport {
        source,
        loaded_at: now,
        entries,
        trailing_lines: split.trailing_lines,
        duplicate_names,
    };
    log::info!(
        "Catalog loaded from {}: {} tracked, {} skipped",
        report.source,
        report.tracked_count(),
        report.skipped_count()
    );

    Catalog::new(objects, report)
}

fn track<B: ModelBuilder>(
    triplet: &Triplet<'_>,
    builder: &B,
    now: DateTime<Utc>,
    spec: &PathSpec,
    seen_ids: &HashSet<u64>,
) -> Result<TrackedObject, SkipReason> {
    if !triplet.looks_like_tle() {
        return Err(SkipReason::MalformedLines);
    }

    let model = builder
        .build(&TleLines {
            name: triplet.name,
            line1: triplet.line1,
            line2: triplet.line2,
        })
        .map_err(|e| SkipReason::InvalidElements {
            message: e.to_string(),
        })?;

    let id = model.id();
    if seen_ids.contains(&id) {
        return Err(SkipReason::DuplicateId { id });
    }

    let current = locate(&model, now).map_err(|e| SkipReason::NoPosition {
        message: e.to_string(),
    })?;

    let path = PathSampler::new(&model, now, spec)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SkipReason::PathFailed {
            message: e.to_string(),
        })?;

    Ok(TrackedObject {
        id,
        name: triplet.name.to_string(),
        lat: current.latitude_deg,
        lng: current.longitude_deg,
        alt: current.normalized_altitude(),
        path,
        details: ObjectDetails::default(),
    })
}

fn duplicate_names(objects: &[TrackedObject]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for object in objects {
        *counts.entry(object.name.as_str()).or_default() += 1;
    }
    let mut names: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    names.sort();
    names
}
