//! File-backed registry store.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use keeper_core::time::now_stamp;

use crate::errors::{RegistryError, Result};
use crate::types::{Registry, RegistryEntry};

/// Reads and atomically rewrites the registry file.
#[derive(Clone, Debug)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// A store for the registry file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The registry file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry.
    ///
    /// A missing file yields an empty registry; an unparseable one is
    /// [`RegistryError::Corrupt`].
    pub fn load(&self) -> Result<Registry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "registry not found, starting empty");
                return Ok(Registry::default());
            }
            Err(e) => return Err(RegistryError::io(&self.path, e)),
        };
        serde_json::from_str(&content).map_err(|source| RegistryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Persist the registry through a temp file in the same directory, then rename.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| RegistryError::io(&dir, e))?;

        let mut body = serde_json::to_string_pretty(registry)?;
        body.push('\n');

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| RegistryError::io(&dir, e))?;
        tmp.write_all(body.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| RegistryError::io(tmp.path(), e))?;
        let _ = tmp.persist(&self.path)?;

        debug!(path = %self.path.display(), services = registry.len(), "registry saved");
        Ok(())
    }

    /// Insert or overwrite an entry, stamping `last_sync` with the current time.
    ///
    /// An existing entry keeps its position and unknown fields.
    pub fn register(
        &self,
        id: &str,
        name: &str,
        territory: Vec<String>,
        skill_path: &str,
        description: &str,
    ) -> Result<RegistryEntry> {
        validate_id(id)?;
        let mut registry = self.load()?;
        let entry = RegistryEntry {
            name: name.to_string(),
            territory,
            skill_path: skill_path.to_string(),
            description: description.to_string(),
            last_sync: Some(now_stamp()),
            extra: indexmap::IndexMap::new(),
        };
        let stored = registry.upsert(id, entry).clone();
        self.save(&registry)?;
        info!(id, patterns = stored.territory.len(), "service registered");
        Ok(stored)
    }

    /// Remove an entry. Returns `false` when the id was not registered.
    pub fn unregister(&self, id: &str) -> Result<bool> {
        let mut registry = self.load()?;
        if registry.remove(id).is_none() {
            return Ok(false);
        }
        self.save(&registry)?;
        info!(id, "service unregistered");
        Ok(true)
    }

    /// Fetch one entry.
    pub fn get(&self, id: &str) -> Result<Option<RegistryEntry>> {
        Ok(self.load()?.services.shift_remove(id))
    }

    /// The id of the first entry whose territory owns `path`.
    pub fn find_owner(&self, path: &str) -> Result<Option<String>> {
        Ok(self.load()?.owner_of(path).map(ToString::to_string))
    }

    /// Re-stamp an entry's `last_sync`. Returns `false` for an unknown id.
    pub fn mark_synced(&self, id: &str) -> Result<bool> {
        let mut registry = self.load()?;
        let Some(entry) = registry.services.get_mut(id) else {
            return Ok(false);
        };
        entry.last_sync = Some(now_stamp());
        self.save(&registry)?;
        info!(id, "service marked synced");
        Ok(true)
    }

    /// All entries in registry order.
    pub fn list(&self) -> Result<Vec<(String, RegistryEntry)>> {
        Ok(self.load()?.services.into_iter().collect())
    }
}

fn validate_id(id: &str) -> Result<()> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.chars().any(char::is_whitespace);
    if bad {
        Err(RegistryError::InvalidId(id.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use keeper_core::time::parse_stamp;

    fn store() -> (tempfile::TempDir, RegistryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path().join(".claude/skills/service-registry.json"));
        (dir, store)
    }

    fn svc1(store: &RegistryStore) -> RegistryEntry {
        store
            .register("svc1", "Service One", vec!["svc1/**".into()], "svc1/SKILL.md", "desc")
            .unwrap()
    }

    #[test]
    fn load_missing_is_empty() {
        let (_dir, store) = store();
        let reg = store.load().unwrap();
        assert_eq!(reg.version, "1.0");
        assert!(reg.is_empty());
    }

    #[test]
    fn load_corrupt_is_error() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_matches!(store.load(), Err(RegistryError::Corrupt { .. }));
    }

    #[test]
    fn load_wrong_shape_is_corrupt() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"services": {"a": {"territory": "svc/**"}}}"#).unwrap();
        assert_matches!(store.load(), Err(RegistryError::Corrupt { .. }));
    }

    #[test]
    fn register_then_load_round_trips() {
        let (_dir, store) = store();
        let _ = svc1(&store);

        let reg = store.load().unwrap();
        let entry = reg.get("svc1").unwrap();
        assert_eq!(entry.name, "Service One");
        assert_eq!(entry.territory, vec!["svc1/**"]);
        assert_eq!(entry.skill_path, "svc1/SKILL.md");
        assert_eq!(entry.description, "desc");

        let stamp = entry.last_sync.as_deref().unwrap();
        assert!(stamp.ends_with('Z'), "{stamp}");
        assert!(parse_stamp(stamp).is_some());
    }

    #[test]
    fn register_overwrite_keeps_order_and_unknown_fields() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"version": "1.0", "note": "keep me", "services": {
                "a": {"name": "A", "territory": ["a/**"], "skill_path": "a/SKILL.md",
                      "description": "", "last_sync": null, "owner": "team-x"},
                "b": {"name": "B", "territory": ["b/**"], "skill_path": "b/SKILL.md",
                      "description": "", "last_sync": null}
            }}"#,
        )
        .unwrap();

        let _ = store
            .register("a", "A2", vec!["a/src/**".into()], "a/SKILL.md", "")
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["note"], "keep me");
        assert_eq!(raw["services"]["a"]["owner"], "team-x");
        assert_eq!(raw["services"]["a"]["name"], "A2");

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn register_rejects_bad_ids() {
        let (_dir, store) = store();
        for id in ["", "a/b", "a b", ".."] {
            assert_matches!(
                store.register(id, "X", Vec::new(), "x", ""),
                Err(RegistryError::InvalidId(_)),
                "id {id:?}"
            );
        }
        assert!(!store.path().exists());
    }

    #[test]
    fn unregister_unknown_is_false_twice() {
        let (_dir, store) = store();
        assert!(!store.unregister("nonexistent").unwrap());
        assert!(!store.unregister("nonexistent").unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn unregister_existing_then_get_is_none() {
        let (_dir, store) = store();
        let _ = svc1(&store);
        assert!(store.unregister("svc1").unwrap());
        assert!(store.get("svc1").unwrap().is_none());
        assert!(!store.unregister("svc1").unwrap());
    }

    #[test]
    fn find_owner_uses_registry_order() {
        let (_dir, store) = store();
        let _ = store
            .register("all", "All", vec!["services/**".into()], "all/SKILL.md", "")
            .unwrap();
        let _ = store
            .register("api", "Api", vec!["services/api/**".into()], "api/SKILL.md", "")
            .unwrap();
        assert_eq!(store.find_owner("services/api/x.py").unwrap().as_deref(), Some("all"));
        assert_eq!(store.find_owner("README.md").unwrap(), None);
    }

    #[test]
    fn mark_synced_restamps() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"services": {"a": {"name": "A", "last_sync": "2020-01-01T00:00:00Z"}}}"#,
        )
        .unwrap();

        assert!(store.mark_synced("a").unwrap());
        let stamp = store.get("a").unwrap().unwrap().last_sync.unwrap();
        let parsed = parse_stamp(&stamp).unwrap();
        assert!(parsed > parse_stamp("2020-01-01T00:00:00Z").unwrap());
        assert!(!store.mark_synced("missing").unwrap());
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let (_dir, store) = store();
        let _ = svc1(&store);
        let _ = store
            .register("svc2", "Two", vec!["svc2/**".into()], "svc2/SKILL.md", "")
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["service-registry.json"]);
    }

    #[test]
    fn saved_file_is_pretty_json_with_newline() {
        let (_dir, store) = store();
        let _ = svc1(&store);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("{\n  \"version\": \"1.0\""));
        assert!(raw.ends_with("}\n"));
    }
}
