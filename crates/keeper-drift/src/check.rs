//! Single-file ownership check, used after a file write.

use std::path::Path;

use keeper_registry::Registry;
use keeper_territory::normalize_path;

/// A written file that belongs to a registered artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedFile {
    /// Owning service id.
    pub id: String,
    /// Owning service display name.
    pub name: String,
    /// Artifact to review.
    pub skill_path: String,
    /// The entry's last sync stamp.
    pub last_sync: Option<String>,
    /// The written file, root-relative.
    pub path: String,
}

/// Why a written file needs no attention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotOwned {
    /// The path is outside the project root.
    OutsideRoot,
    /// The path is an artifact itself.
    Artifact(String),
    /// No territory claims the path.
    Unowned(String),
}

/// Outcome of [`check_path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriftCheck {
    /// The file belongs to a registered artifact.
    Owned(OwnedFile),
    /// The file is not tracked by any artifact.
    NotOwned(NotOwned),
}

/// Find the artifact (if any) that a just-written `path` drifts.
pub fn check_path(registry: &Registry, root: &Path, path: &str) -> DriftCheck {
    let Some(rel) = normalize_path(path, root) else {
        return DriftCheck::NotOwned(NotOwned::OutsideRoot);
    };

    let is_artifact = registry
        .iter()
        .any(|(_, e)| normalize_path(&e.skill_path, root).as_deref() == Some(rel.as_str()));
    if is_artifact {
        return DriftCheck::NotOwned(NotOwned::Artifact(rel));
    }

    let Some(id) = registry.owner_of(&rel) else {
        return DriftCheck::NotOwned(NotOwned::Unowned(rel));
    };
    let Some(entry) = registry.get(id) else {
        return DriftCheck::NotOwned(NotOwned::Unowned(rel));
    };
    DriftCheck::Owned(OwnedFile {
        id: id.to_string(),
        name: entry.name.clone(),
        skill_path: entry.skill_path.clone(),
        last_sync: entry.last_sync.clone(),
        path: rel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use keeper_registry::RegistryEntry;

    fn registry() -> Registry {
        let mut reg = Registry::default();
        let _ = reg.upsert(
            "svc1",
            RegistryEntry {
                name: "Service One".into(),
                territory: vec!["svc1/**".into(), ".claude/skills/**".into()],
                skill_path: ".claude/skills/svc1/SKILL.md".into(),
                last_sync: Some("2026-01-01T00:00:00.000000Z".into()),
                ..RegistryEntry::default()
            },
        );
        reg
    }

    #[test]
    fn owned_absolute_path() {
        let check = check_path(&registry(), Path::new("/repo"), "/repo/svc1/main.py");
        assert_matches!(check, DriftCheck::Owned(f) if f.id == "svc1" && f.path == "svc1/main.py");
    }

    #[test]
    fn owned_relative_path_keeps_metadata() {
        let DriftCheck::Owned(file) = check_path(&registry(), Path::new("/repo"), "./svc1/a.py") else {
            panic!("expected owned");
        };
        assert_eq!(file.name, "Service One");
        assert_eq!(file.skill_path, ".claude/skills/svc1/SKILL.md");
        assert!(file.last_sync.is_some());
    }

    #[test]
    fn outside_root() {
        assert_eq!(
            check_path(&registry(), Path::new("/repo"), "/etc/hosts"),
            DriftCheck::NotOwned(NotOwned::OutsideRoot)
        );
    }

    #[test]
    fn editing_the_artifact_is_not_drift() {
        assert_matches!(
            check_path(&registry(), Path::new("/repo"), "/repo/.claude/skills/svc1/SKILL.md"),
            DriftCheck::NotOwned(NotOwned::Artifact(_))
        );
    }

    #[test]
    fn unowned_file() {
        assert_eq!(
            check_path(&registry(), Path::new("/repo"), "README.md"),
            DriftCheck::NotOwned(NotOwned::Unowned("README.md".into()))
        );
    }
}
