use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Why a catalog entry did not become a tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema, strum_macros::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Second or third line is not a TLE line.
    MalformedLines,
    InvalidElements { message: String },
    /// No valid current position, typically a decayed orbit.
    NoPosition { message: String },
    PathFailed { message: String },
    DuplicateId { id: u64 },
}

impl SkipReason {
    pub fn detail(&self) -> String {
        match self {
            SkipReason::MalformedLines => "expected TLE lines 1 and 2".to_string(),
            SkipReason::InvalidElements { message }
            | SkipReason::NoPosition { message }
            | SkipReason::PathFailed { message } => message.clone(),
            SkipReason::DuplicateId { id } => format!("catalog number {id} already tracked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Tracked { id: u64 },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EntryReport {
    pub line: usize,
    pub name: String,
    pub outcome: EntryOutcome,
}

/// Per-entry outcome of one catalog load.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoadReport {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub entries: Vec<EntryReport>,
    pub trailing_lines: usize,
    /// Names carried by more than one tracked object.
    pub duplicate_names: Vec<String>,
}

impl LoadReport {
    pub fn tracked_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, EntryOutcome::Tracked { .. }))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&EntryReport, &SkipReason)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            EntryOutcome::Skipped { reason } => Some((e, reason)),
            EntryOutcome::Tracked { .. } => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}
