//! Tree scan for files modified after each entry's last sync.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use keeper_core::ChangeRecord;
use keeper_core::time::parse_stamp;
use keeper_registry::Registry;
use keeper_territory::Territory;

use crate::clock::FileClock;

/// Directory names never descended into.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "vendor",
    "__pycache__",
    "venv",
    "dist",
    "build",
];

/// Files an entry's territory owns that changed after its `last_sync`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncDrift {
    /// Service id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Parsed `last_sync`.
    pub last_sync: DateTime<Utc>,
    /// Modified files, most recent first.
    pub files: Vec<ChangeRecord>,
}

/// Walk the project and report, per entry, territory files newer than its
/// `last_sync`.
///
/// Entries never synced (or with an unparseable stamp) are skipped, as are
/// hidden directories and common vendor/build directories. Results follow
/// registry order; entries with nothing newer are omitted.
pub fn scan_since_sync(registry: &Registry, root: &Path, clock: &dyn FileClock) -> Vec<SyncDrift> {
    let candidates: Vec<(&str, &str, DateTime<Utc>, Territory)> = registry
        .iter()
        .filter_map(|(id, e)| {
            let stamp = e.last_sync.as_deref().and_then(parse_stamp);
            if stamp.is_none() {
                debug!(id, "no usable last_sync, skipping scan");
            }
            let territory = e.compiled_territory();
            (!territory.is_empty()).then_some((id, e.name.as_str(), stamp?, territory))
        })
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let files = walk(root);
    debug!(files = files.len(), "scanned project tree");

    candidates
        .into_iter()
        .filter_map(|(id, name, last_sync, territory)| {
            let mut newer: Vec<ChangeRecord> = files
                .iter()
                .filter(|rel| territory.owns(rel))
                .filter_map(|rel| {
                    let modified = clock.modified(&root.join(rel))?;
                    (modified > last_sync).then(|| ChangeRecord::new(rel.as_str(), modified))
                })
                .collect();
            if newer.is_empty() {
                return None;
            }
            newer.sort_by(|a, b| b.modified.cmp(&a.modified));
            Some(SyncDrift {
                id: id.to_string(),
                name: name.to_string(),
                last_sync,
                files: newer,
            })
        })
        .collect()
}

/// Root-relative paths of every regular file worth scanning, sorted.
fn walk(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(root).ok()?;
            Some(rel.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIP_DIRS.contains(&&*name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FsClock;
    use keeper_core::time::format_stamp;
    use keeper_registry::RegistryEntry;
    use std::time::{Duration, SystemTime};

    fn touch(root: &Path, rel: &str, at: SystemTime) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, rel).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(at).unwrap();
    }

    fn entry(territory: &str, last_sync: Option<String>) -> RegistryEntry {
        RegistryEntry {
            name: "Svc".into(),
            territory: vec![territory.into()],
            skill_path: "skill.md".into(),
            last_sync,
            ..RegistryEntry::default()
        }
    }

    #[test]
    fn reports_files_newer_than_last_sync() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::now() - Duration::from_secs(3_600);
        touch(dir.path(), "svc1/old.py", base);
        touch(dir.path(), "svc1/new.py", base + Duration::from_secs(1_200));
        touch(dir.path(), "svc1/newest.py", base + Duration::from_secs(2_400));
        touch(dir.path(), "svc1/node_modules/dep.js", base + Duration::from_secs(2_400));
        touch(dir.path(), "svc1/.cache/x.py", base + Duration::from_secs(2_400));

        let sync = format_stamp(DateTime::<Utc>::from(base + Duration::from_secs(600)));
        let mut reg = Registry::default();
        let _ = reg.upsert("svc1", entry("svc1/**", Some(sync)));

        let drift = scan_since_sync(&reg, dir.path(), &FsClock);
        assert_eq!(drift.len(), 1);
        let paths: Vec<&str> = drift[0].files.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["svc1/newest.py", "svc1/new.py"]);
    }

    #[test]
    fn never_synced_entries_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "svc1/a.py", SystemTime::now());
        let mut reg = Registry::default();
        let _ = reg.upsert("svc1", entry("svc1/**", None));
        let _ = reg.upsert("svc2", entry("svc1/**", Some("not a date".into())));
        assert!(scan_since_sync(&reg, dir.path(), &FsClock).is_empty());
    }

    #[test]
    fn up_to_date_entry_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let past = SystemTime::now() - Duration::from_secs(600);
        touch(dir.path(), "svc1/a.py", past);
        let mut reg = Registry::default();
        let _ = reg.upsert("svc1", entry("svc1/**", Some(format_stamp(Utc::now()))));
        assert!(scan_since_sync(&reg, dir.path(), &FsClock).is_empty());
    }
}
