//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a project file may override a single nested key and inherit the rest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "staleness": { "globalTriggers": ["docker-compose.yml"] },
///   "git": { "timeoutMs": 3000 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeeperSettings {
    /// Where skills, the registry, and memories live.
    pub paths: PathSettings,
    /// Protected-region delimiter lines.
    pub sentinels: SentinelSettings,
    /// Staleness engine knobs.
    pub staleness: StalenessSettings,
    /// Version-control invocation.
    pub git: GitSettings,
    /// Pre-commit documentation reminder.
    pub reminder: ReminderSettings,
    /// Git-hook presentation and strictness.
    pub hooks: HookSettings,
    /// Agent-context message budget.
    pub context: ContextSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl KeeperSettings {
    /// Absolute skills directory for a project root.
    pub fn skills_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.skills_dir)
    }

    /// Absolute registry file path for a project root.
    pub fn registry_path(&self, root: &Path) -> PathBuf {
        self.skills_dir(root).join(&self.paths.registry_file)
    }

    /// Absolute memories directory for a project root.
    pub fn memories_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.memories_dir)
    }

    /// Default artifact path (relative to root) for a service id.
    pub fn default_skill_path(&self, id: &str) -> String {
        format!(
            "{}/{id}/SKILL.md",
            self.paths.skills_dir.trim_end_matches('/')
        )
    }

    /// Remediation command for a service id.
    pub fn remediation_for(&self, id: &str) -> String {
        self.staleness.remediation.replace("{id}", id)
    }
}

/// Filesystem layout, all relative to the project root.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathSettings {
    /// Skills directory.
    pub skills_dir: String,
    /// Registry file name inside the skills directory.
    pub registry_file: String,
    /// Directory of tracked memory documents.
    pub memories_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            skills_dir: ".claude/skills".to_string(),
            registry_file: "service-registry.json".to_string(),
            memories_dir: ".serena/memories".to_string(),
        }
    }
}

/// Protected-region delimiters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentinelSettings {
    /// Start marker line.
    pub start: String,
    /// End marker line.
    pub end: String,
}

impl Default for SentinelSettings {
    fn default() -> Self {
        Self {
            start: "<!-- SEMANTIC_START -->".to_string(),
            end: "<!-- SEMANTIC_END -->".to_string(),
        }
    }
}

/// Staleness engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StalenessSettings {
    /// Files that, when changed, put every artifact up for review.
    pub global_triggers: Vec<String>,
    /// Triggers kept per finding.
    pub max_triggers: usize,
    /// Triggers printed per finding in the advisory block.
    pub display_triggers: usize,
    /// Remediation command template; `{id}` is replaced by the service id.
    pub remediation: String,
}

impl Default for StalenessSettings {
    fn default() -> Self {
        Self {
            global_triggers: vec![
                "docker-compose.yml".to_string(),
                "scripts/docker-entrypoint.sh".to_string(),
                ".env.TEMPLATE".to_string(),
            ],
            max_triggers: 5,
            display_triggers: 3,
            remediation: "skill-keeper regenerate {id}".to_string(),
        }
    }
}

/// Git invocation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitSettings {
    /// Hard timeout for a single git call.
    pub timeout_ms: u64,
    /// Default window for recent-N scans.
    pub recent_commits: usize,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            recent_commits: 30,
        }
    }
}

/// Pre-commit reminder settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    /// Patterns of behavior-changing source files.
    pub source_paths: Vec<String>,
    /// Patterns whose presence in the commit suppresses the reminder.
    pub ssot_paths: Vec<String>,
    /// Changed paths listed before collapsing into "... and N more".
    pub max_listed: usize,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            source_paths: vec!["src/".to_string(), "scripts/".to_string()],
            ssot_paths: vec![".serena/memories/".to_string()],
            max_listed: 6,
        }
    }
}

/// Git-hook behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HookSettings {
    /// Block pushes on staleness instead of warning.
    pub strict: bool,
    /// Emit ANSI colour in advisory output.
    pub color: bool,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            strict: false,
            color: true,
        }
    }
}

/// Agent-context budget.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextSettings {
    /// Hard cap on the additional-context string, in characters.
    pub max_chars: usize,
    /// Identifiers listed before the `(+N more)` counter.
    pub max_names: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_chars: 400,
            max_names: 3,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
