//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`KeeperSettings::default()`]
//! 2. If `<root>/.claude/skills/keeper.json` exists, deep-merge its values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use keeper_core::constants::STRICT_ENV_VAR;

use crate::errors::{Result, SettingsError};
use crate::types::KeeperSettings;

/// Settings file location relative to the project root.
pub const SETTINGS_FILE: &str = ".claude/skills/keeper.json";

/// Git timeout bounds accepted from the environment, in milliseconds.
const GIT_TIMEOUT_RANGE: (u64, u64) = (100, 60_000);

/// Resolve the settings file for a project root.
pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

/// Load settings for a project root with process env overrides.
pub fn load_settings(root: &Path) -> Result<KeeperSettings> {
    load_settings_from_path(&settings_path(root))
}

/// Load settings from a specific path with process env overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<KeeperSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Defaults merged with the project file, without env overrides.
fn load_file_layer(path: &Path) -> Result<KeeperSettings> {
    if !path.exists() {
        debug!(?path, "settings file not found, using defaults");
        return Ok(KeeperSettings::default());
    }
    let defaults = serde_json::to_value(KeeperSettings::default())?;

    debug!(?path, "loading settings from file");
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let user: Value = serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_value(deep_merge(defaults, user)).map_err(|source| SettingsError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides<F>(settings: &mut KeeperSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(STRICT_ENV_VAR) {
        match parse_bool(&raw) {
            Some(v) => settings.hooks.strict = v,
            None => tracing::warn!(key = STRICT_ENV_VAR, value = %raw, "invalid boolean env var, ignoring"),
        }
    }
    if let Some(raw) = lookup("KEEPER_GIT_TIMEOUT_MS") {
        let (min, max) = GIT_TIMEOUT_RANGE;
        match parse_u64_range(&raw, min, max) {
            Some(v) => settings.git.timeout_ms = v,
            None => tracing::warn!(key = "KEEPER_GIT_TIMEOUT_MS", value = %raw, "invalid u64 env var, ignoring"),
        }
    }
    if let Some(v) = lookup("KEEPER_SKILLS_DIR").filter(|v| !v.is_empty()) {
        settings.paths.skills_dir = v;
    }
    if let Some(v) = lookup("KEEPER_LOG").filter(|v| !v.is_empty()) {
        settings.logging.level = v;
    }
    // https://no-color.org: presence with any non-empty value disables colour
    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        settings.hooks.color = false;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"git": {"timeoutMs": 5000, "recentCommits": 30}});
        let source = serde_json::json!({"git": {"timeoutMs": 900}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["git"]["timeoutMs"], 900);
        assert_eq!(merged["git"]["recentCommits"], 30);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"a": null});
        assert_eq!(deep_merge(target, source)["a"], 1);
    }

    #[test]
    fn merge_new_keys_added() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    // ── file layer ──────────────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_file_layer(Path::new("/nonexistent/keeper.json")).unwrap();
        assert_eq!(settings.git.timeout_ms, 5_000);
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.json");
        std::fs::write(
            &path,
            r#"{"staleness": {"globalTriggers": ["compose.yaml"]}, "context": {"maxChars": 200}}"#,
        )
        .unwrap();

        let settings = load_file_layer(&path).unwrap();
        assert_eq!(settings.staleness.global_triggers, vec!["compose.yaml"]);
        assert_eq!(settings.staleness.max_triggers, 5);
        assert_eq!(settings.context.max_chars, 200);
        assert_eq!(settings.context.max_names, 3);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.json");
        std::fs::write(&path, "not valid json").unwrap();
        assert_matches!(load_file_layer(&path), Err(SettingsError::Parse { path: p, .. }) if p == path);
    }

    #[test]
    fn load_wrong_value_type_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keeper.json");
        std::fs::write(&path, r#"{"git": {"timeoutMs": "soon"}}"#).unwrap();
        let err = load_file_layer(&path).unwrap_err();
        assert_matches!(err, SettingsError::Invalid { .. });
        assert!(err.to_string().contains("keeper.json"));
    }

    #[test]
    fn settings_path_is_under_skills_dir() {
        assert_eq!(
            settings_path(Path::new("/repo")),
            PathBuf::from("/repo/.claude/skills/keeper.json")
        );
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn strict_env_enables_strict_mode() {
        let mut s = KeeperSettings::default();
        apply_env_overrides(&mut s, env(&[("SKILL_HOOK_STRICT", "1")]));
        assert!(s.hooks.strict);
    }

    #[test]
    fn strict_env_invalid_is_ignored() {
        let mut s = KeeperSettings::default();
        apply_env_overrides(&mut s, env(&[("SKILL_HOOK_STRICT", "maybe")]));
        assert!(!s.hooks.strict);
    }

    #[test]
    fn git_timeout_env_respects_range() {
        let mut s = KeeperSettings::default();
        apply_env_overrides(&mut s, env(&[("KEEPER_GIT_TIMEOUT_MS", "2500")]));
        assert_eq!(s.git.timeout_ms, 2_500);

        let mut s = KeeperSettings::default();
        apply_env_overrides(&mut s, env(&[("KEEPER_GIT_TIMEOUT_MS", "10")]));
        assert_eq!(s.git.timeout_ms, 5_000);
    }

    #[test]
    fn no_color_disables_colour() {
        let mut s = KeeperSettings::default();
        apply_env_overrides(&mut s, env(&[("NO_COLOR", "1")]));
        assert!(!s.hooks.color);

        let mut s = KeeperSettings::default();
        apply_env_overrides(&mut s, env(&[("NO_COLOR", "")]));
        assert!(s.hooks.color);
    }

    #[test]
    fn string_overrides_apply() {
        let mut s = KeeperSettings::default();
        apply_env_overrides(
            &mut s,
            env(&[("KEEPER_SKILLS_DIR", "docs/skills"), ("KEEPER_LOG", "debug")]),
        );
        assert_eq!(s.paths.skills_dir, "docs/skills");
        assert_eq!(s.logging.level, "debug");
    }

    // ── parse helpers ───────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for val in &["true", "1", "yes", "on", "TRUE", " Yes "] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
        for val in &["false", "0", "no", "off", "OFF"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
        assert_eq!(parse_bool("2"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn parse_u64_range_bounds() {
        assert_eq!(parse_u64_range("100", 100, 60_000), Some(100));
        assert_eq!(parse_u64_range("60000", 100, 60_000), Some(60_000));
        assert_eq!(parse_u64_range("60001", 100, 60_000), None);
        assert_eq!(parse_u64_range("abc", 100, 60_000), None);
    }
}
