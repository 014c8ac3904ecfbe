//! The staleness engine.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use keeper_core::{ChangeRecord, StalenessFinding};
use keeper_registry::Registry;
use keeper_territory::Territory;

use crate::clock::FileClock;

/// Default cap on triggers kept per finding.
const DEFAULT_MAX_TRIGGERS: usize = 5;

/// Default remediation template; `{id}` is replaced by the service id.
const DEFAULT_REMEDIATION: &str = "skill-keeper regenerate {id}";

/// Inputs the engine needs besides the registry and change set.
pub struct EvalContext<'a> {
    /// Project root all relative paths resolve against.
    pub root: &'a Path,
    /// Source of modification times.
    pub clock: &'a dyn FileClock,
    /// Triggers kept per finding.
    pub max_triggers: usize,
    /// Remediation command template.
    pub remediation: String,
}

impl<'a> EvalContext<'a> {
    /// Context with the default trigger cap and remediation template.
    pub fn new(root: &'a Path, clock: &'a dyn FileClock) -> Self {
        Self {
            root,
            clock,
            max_triggers: DEFAULT_MAX_TRIGGERS,
            remediation: DEFAULT_REMEDIATION.to_string(),
        }
    }

    /// Override the trigger cap.
    #[must_use]
    pub fn with_max_triggers(mut self, max: usize) -> Self {
        self.max_triggers = max;
        self
    }

    /// Override the remediation template.
    #[must_use]
    pub fn with_remediation(mut self, template: impl Into<String>) -> Self {
        self.remediation = template.into();
        self
    }
}

/// Whether any changed path matches a global trigger pattern.
pub fn is_globally_triggered<S: AsRef<str>>(changeset: &BTreeSet<String>, patterns: &[S]) -> bool {
    let global = Territory::new(patterns);
    changeset.iter().any(|p| global.owns(p))
}

/// Decide which registry entries are stale with respect to `changeset`.
///
/// With `global_active`, every entry is checked against the changed files
/// matching `global_triggers`; otherwise each entry is checked against the
/// changed files it owns (first registered owner wins). An entry is stale
/// when one of those files was modified strictly after its artifact.
/// Entries with an empty territory or a missing artifact are skipped.
///
/// Findings come out in registry order.
pub fn evaluate<S: AsRef<str>>(
    registry: &Registry,
    changeset: &BTreeSet<String>,
    global_triggers: &[S],
    global_active: bool,
    ctx: &EvalContext<'_>,
) -> Vec<StalenessFinding> {
    let ownership = registry.ownership();
    let global_files: Vec<&str> = if global_active {
        let global = Territory::new(global_triggers);
        changeset
            .iter()
            .map(String::as_str)
            .filter(|p| global.owns(p))
            .collect()
    } else {
        Vec::new()
    };

    let mut findings = Vec::new();
    for (id, entry) in registry.iter() {
        if entry.territory.is_empty() {
            continue;
        }

        let relevant: Vec<&str> = if global_active {
            global_files.clone()
        } else {
            changeset
                .iter()
                .map(String::as_str)
                .filter(|p| ownership.owner_of(p) == Some(id))
                .collect()
        };
        if relevant.is_empty() {
            continue;
        }

        let Some(artifact_modified) = ctx.clock.modified(&ctx.root.join(&entry.skill_path)) else {
            debug!(id, skill_path = %entry.skill_path, "artifact missing, skipping staleness check");
            continue;
        };

        let mut triggers: Vec<ChangeRecord> = relevant
            .into_iter()
            .filter_map(|p| {
                let modified = ctx.clock.modified(&ctx.root.join(p))?;
                (modified > artifact_modified).then(|| ChangeRecord::new(p, modified))
            })
            .collect();
        if triggers.is_empty() {
            continue;
        }

        // stable: equal instants keep first-encountered order
        triggers.sort_by(|a, b| b.modified.cmp(&a.modified));
        triggers.truncate(ctx.max_triggers.max(1));

        debug!(id, triggers = triggers.len(), "artifact is stale");
        findings.push(StalenessFinding {
            service_id: id.to_string(),
            name: entry.name.clone(),
            skill_path: entry.skill_path.clone(),
            last_sync: entry.last_sync.clone(),
            artifact_modified,
            triggers,
            remediation: ctx.remediation.replace("{id}", id),
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use keeper_registry::RegistryEntry;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory clock keyed by path relative to `/repo`.
    struct MapClock(HashMap<PathBuf, DateTime<Utc>>);

    impl MapClock {
        fn new(entries: &[(&str, i64)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(p, secs)| (Path::new("/repo").join(p), t(*secs)))
                    .collect(),
            )
        }
    }

    impl FileClock for MapClock {
        fn modified(&self, path: &Path) -> Option<DateTime<Utc>> {
            self.0.get(path).copied()
        }
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn registry(entries: &[(&str, &[&str])]) -> Registry {
        let mut reg = Registry::default();
        for (id, territory) in entries {
            let _ = reg.upsert(
                id,
                RegistryEntry {
                    name: format!("{id} name"),
                    territory: territory.iter().map(ToString::to_string).collect(),
                    skill_path: format!(".claude/skills/{id}/SKILL.md"),
                    ..RegistryEntry::default()
                },
            );
        }
        reg
    }

    fn changes(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(ToString::to_string).collect()
    }

    const NO_GLOBALS: [&str; 0] = [];

    #[test]
    fn newer_owned_file_is_stale() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[(".claude/skills/svc1/SKILL.md", 0), ("svc1/main.py", 10)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);

        let findings = evaluate(&reg, &changes(&["svc1/main.py"]), &NO_GLOBALS, false, &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].service_id, "svc1");
        assert_eq!(findings[0].primary_trigger().unwrap().path, "svc1/main.py");
        assert_eq!(findings[0].remediation, "skill-keeper regenerate svc1");
        assert_eq!(findings[0].artifact_modified, t(0));
    }

    #[test]
    fn older_owned_file_is_fresh() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[(".claude/skills/svc1/SKILL.md", 10), ("svc1/main.py", 0)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        assert!(evaluate(&reg, &changes(&["svc1/main.py"]), &NO_GLOBALS, false, &ctx).is_empty());
    }

    #[test]
    fn equal_mtime_is_fresh() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[(".claude/skills/svc1/SKILL.md", 5), ("svc1/main.py", 5)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        assert!(evaluate(&reg, &changes(&["svc1/main.py"]), &NO_GLOBALS, false, &ctx).is_empty());
    }

    #[test]
    fn unowned_changes_produce_nothing() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[(".claude/skills/svc1/SKILL.md", 0), ("docs/x.md", 100)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        assert!(evaluate(&reg, &changes(&["docs/x.md"]), &NO_GLOBALS, false, &ctx).is_empty());
    }

    #[test]
    fn missing_artifact_is_skipped() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[("svc1/main.py", 10)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        assert!(evaluate(&reg, &changes(&["svc1/main.py"]), &NO_GLOBALS, false, &ctx).is_empty());
    }

    #[test]
    fn deleted_trigger_is_ignored() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[(".claude/skills/svc1/SKILL.md", 0)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        assert!(evaluate(&reg, &changes(&["svc1/gone.py"]), &NO_GLOBALS, false, &ctx).is_empty());
    }

    #[test]
    fn empty_territory_never_stale() {
        let reg = registry(&[("idle", &[])]);
        let clock = MapClock::new(&[(".claude/skills/idle/SKILL.md", 0), ("docker-compose.yml", 9)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        let findings = evaluate(&reg, &changes(&["docker-compose.yml"]), &["docker-compose.yml"], true, &ctx);
        assert!(findings.is_empty());
    }

    #[test]
    fn first_registered_owner_takes_the_file() {
        let reg = registry(&[("broad", &["services/**"]), ("api", &["services/api/**"])]);
        let clock = MapClock::new(&[
            (".claude/skills/broad/SKILL.md", 0),
            (".claude/skills/api/SKILL.md", 0),
            ("services/api/main.py", 10),
        ]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        let findings = evaluate(&reg, &changes(&["services/api/main.py"]), &NO_GLOBALS, false, &ctx);
        let ids: Vec<&str> = findings.iter().map(|f| f.service_id.as_str()).collect();
        assert_eq!(ids, vec!["broad"]);
    }

    #[test]
    fn global_mode_checks_every_entry() {
        let reg = registry(&[("b", &["b/**"]), ("a", &["a/**"])]);
        let clock = MapClock::new(&[
            (".claude/skills/a/SKILL.md", 0),
            (".claude/skills/b/SKILL.md", 0),
            ("docker-compose.yml", 10),
            ("a/x.py", 20),
        ]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        let set = changes(&["docker-compose.yml", "a/x.py"]);
        let globals = ["docker-compose.yml"];
        assert!(is_globally_triggered(&set, &globals));

        let findings = evaluate(&reg, &set, &globals, true, &ctx);
        let ids: Vec<&str> = findings.iter().map(|f| f.service_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        for f in &findings {
            let paths: Vec<&str> = f.triggers.iter().map(|r| r.path.as_str()).collect();
            assert_eq!(paths, vec!["docker-compose.yml"]);
        }
    }

    #[test]
    fn not_globally_triggered_without_match() {
        assert!(!is_globally_triggered(&changes(&["a/x.py"]), &["docker-compose.yml"]));
        assert!(!is_globally_triggered(&changes(&["a/x.py"]), &NO_GLOBALS));
    }

    #[test]
    fn findings_follow_registry_order() {
        let reg = registry(&[("zeta", &["z/**"]), ("alpha", &["a/**"]), ("mid", &["m/**"])]);
        let clock = MapClock::new(&[
            (".claude/skills/zeta/SKILL.md", 0),
            (".claude/skills/alpha/SKILL.md", 0),
            (".claude/skills/mid/SKILL.md", 0),
            ("a/1", 5),
            ("m/1", 5),
            ("z/1", 5),
        ]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock);
        let findings = evaluate(&reg, &changes(&["a/1", "m/1", "z/1"]), &NO_GLOBALS, false, &ctx);
        let ids: Vec<&str> = findings.iter().map(|f| f.service_id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn triggers_most_recent_first_ties_stable_and_capped() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[
            (".claude/skills/svc1/SKILL.md", 0),
            ("svc1/a.py", 10),
            ("svc1/b.py", 30),
            ("svc1/c.py", 10),
            ("svc1/d.py", 20),
        ]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock).with_max_triggers(3);
        let set = changes(&["svc1/a.py", "svc1/b.py", "svc1/c.py", "svc1/d.py"]);
        let findings = evaluate(&reg, &set, &NO_GLOBALS, false, &ctx);
        let paths: Vec<&str> = findings[0].triggers.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["svc1/b.py", "svc1/d.py", "svc1/a.py"]);
    }

    #[test]
    fn custom_remediation_template() {
        let reg = registry(&[("svc1", &["svc1/**"])]);
        let clock = MapClock::new(&[(".claude/skills/svc1/SKILL.md", 0), ("svc1/main.py", 10)]);
        let ctx = EvalContext::new(Path::new("/repo"), &clock).with_remediation("/sync {id} now");
        let findings = evaluate(&reg, &changes(&["svc1/main.py"]), &NO_GLOBALS, false, &ctx);
        assert_eq!(findings[0].remediation, "/sync svc1 now");
    }
}
