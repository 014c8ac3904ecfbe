//! Ephemeral values passed between the resolver, the engine, and emitters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A changed file and the instant it was last modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Path relative to the project root, forward-slash separated.
    pub path: String,
    /// Last modification instant.
    pub modified: DateTime<Utc>,
}

impl ChangeRecord {
    /// Create a change record.
    pub fn new(path: impl Into<String>, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }
}

/// One stale documentation artifact.
///
/// Produced by the staleness engine and consumed immediately by an emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessFinding {
    /// Registry identifier.
    pub service_id: String,
    /// Display name.
    pub name: String,
    /// Artifact path relative to the project root.
    pub skill_path: String,
    /// Registry `last_sync` stamp, if the entry was ever synced.
    pub last_sync: Option<String>,
    /// On-disk modification instant of the artifact.
    pub artifact_modified: DateTime<Utc>,
    /// Changed files newer than the artifact, most recent first.
    pub triggers: Vec<ChangeRecord>,
    /// Command that regenerates the artifact.
    pub remediation: String,
}

impl StalenessFinding {
    /// The single most relevant trigger (the first one).
    pub fn primary_trigger(&self) -> Option<&ChangeRecord> {
        self.triggers.first()
    }
}
