//! Artifact health check.
//!
//! The staleness engine skips missing artifacts silently; this is where
//! they (and artifacts that a regeneration would refuse to merge) surface.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use keeper_registry::Registry;
use keeper_skills::frontmatter;
use keeper_skills::merger::{Artifact, Sentinels};

/// State of one artifact on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum HealthStatus {
    /// Present, with valid frontmatter and one balanced protected region.
    Healthy,
    /// Not on disk; needs creation.
    Missing,
    /// Present but unreadable, malformed, or without a usable region.
    Invalid(String),
}

impl HealthStatus {
    /// Whether the artifact needs attention.
    pub fn is_problem(&self) -> bool {
        !matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("healthy"),
            Self::Missing => f.write_str("missing"),
            Self::Invalid(detail) => write!(f, "invalid: {detail}"),
        }
    }
}

/// Health of one registry entry's artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Service id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Artifact path relative to the root.
    pub skill_path: String,
    /// Outcome.
    #[serde(flatten)]
    pub status: HealthStatus,
}

/// One report per registry entry, in registry order.
pub fn health(registry: &Registry, root: &Path, sentinels: &Sentinels) -> Vec<HealthReport> {
    registry
        .iter()
        .map(|(id, entry)| HealthReport {
            id: id.to_string(),
            name: entry.name.clone(),
            skill_path: entry.skill_path.clone(),
            status: inspect(&root.join(&entry.skill_path), sentinels),
        })
        .collect()
}

fn inspect(path: &Path, sentinels: &Sentinels) -> HealthStatus {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HealthStatus::Missing,
        Err(e) => return HealthStatus::Invalid(format!("unreadable: {e}")),
    };
    match frontmatter::parse(&content) {
        Ok(fm) if !fm.present => return HealthStatus::Invalid("missing frontmatter".into()),
        Ok(_) => {}
        Err(e) => return HealthStatus::Invalid(e.to_string()),
    }
    match Artifact::parse(&content, sentinels) {
        Ok(_) => HealthStatus::Healthy,
        Err(e) => HealthStatus::Invalid(e.to_string()),
    }
}
