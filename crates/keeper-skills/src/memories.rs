//! Tracked memory documents.
//!
//! A memory is a Markdown file in the memories directory whose frontmatter
//! declares the files it describes:
//!
//! ```text
//! ---
//! tracks: [src/auth/**, src/session.rs]
//! updated: 2026-02-01
//! ---
//! ```
//!
//! Files without a `tracks:` key are not tracked and are ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::frontmatter;

/// One tracked memory document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryDoc {
    /// File stem, used as the document's display name.
    pub name: String,
    /// Full path on disk.
    pub path: PathBuf,
    /// Ownership patterns from `tracks:`.
    pub tracks: Vec<String>,
    /// Free-form `updated:` value, if present.
    pub updated: Option<String>,
}

/// Tracked documents directly inside `dir`, ordered by file name.
///
/// A missing directory yields nothing. Unreadable files and malformed
/// frontmatter are logged and skipped.
pub fn discover(dir: &Path) -> Vec<MemoryDoc> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "memories directory not readable");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    paths.into_iter().filter_map(|path| load(&path)).collect()
}

fn load(path: &Path) -> Option<MemoryDoc> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read memory");
            return None;
        }
    };
    let fm = match frontmatter::parse(&content) {
        Ok(fm) => fm,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed memory frontmatter");
            return None;
        }
    };
    let tracks = fm.get_list("tracks")?;
    let name = path.file_stem()?.to_string_lossy().into_owned();
    Some(MemoryDoc {
        name,
        path: path.to_path_buf(),
        tracks,
        updated: fm.get_str("updated").map(ToString::to_string),
    })
}
