//! Drift for tracked memory documents.

use std::collections::BTreeSet;
use std::path::PathBuf;

use keeper_skills::MemoryDoc;
use keeper_territory::Territory;

/// Changed files listed per document.
pub const MAX_LISTED_FILES: usize = 5;

/// A memory document whose tracked files changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentDrift {
    /// Document name (file stem).
    pub name: String,
    /// Document path on disk.
    pub path: PathBuf,
    /// The document's `updated:` value.
    pub updated: Option<String>,
    /// Up to [`MAX_LISTED_FILES`] matching changed files, sorted.
    pub files: Vec<String>,
    /// Total matching changed files.
    pub total: usize,
}

/// Documents whose `tracks:` patterns match any changed file, ordered by name.
pub fn scan_documents(docs: &[MemoryDoc], changeset: &BTreeSet<String>) -> Vec<DocumentDrift> {
    let mut drifted: Vec<DocumentDrift> = docs
        .iter()
        .filter_map(|doc| {
            let territory = Territory::new(&doc.tracks);
            let matched: Vec<&String> = changeset.iter().filter(|p| territory.owns(p)).collect();
            if matched.is_empty() {
                return None;
            }
            Some(DocumentDrift {
                name: doc.name.clone(),
                path: doc.path.clone(),
                updated: doc.updated.clone(),
                total: matched.len(),
                files: matched
                    .into_iter()
                    .take(MAX_LISTED_FILES)
                    .cloned()
                    .collect(),
            })
        })
        .collect();
    drifted.sort_by(|a, b| a.name.cmp(&b.name));
    drifted
}
