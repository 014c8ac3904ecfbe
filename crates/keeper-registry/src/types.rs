//! Registry document types.
//!
//! The on-disk shape is:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "services": {
//!     "svc1": {
//!       "name": "Service One",
//!       "territory": ["svc1/**"],
//!       "skill_path": ".claude/skills/svc1/SKILL.md",
//!       "description": "",
//!       "last_sync": "2026-02-01T12:30:00.000000Z"
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use keeper_core::constants::REGISTRY_SCHEMA_VERSION;
use keeper_territory::Territory;

/// One tracked documentation artifact.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryEntry {
    /// Display name.
    pub name: String,
    /// Ownership patterns, relative to the project root.
    pub territory: Vec<String>,
    /// Artifact path relative to the project root.
    pub skill_path: String,
    /// Free-text description.
    pub description: String,
    /// Last explicit sync, ISO-8601 UTC with `Z`. `None` means never synced.
    pub last_sync: Option<String>,
    /// Fields this version does not know about, preserved on write.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl RegistryEntry {
    /// Compile this entry's territory.
    pub fn compiled_territory(&self) -> Territory {
        Territory::new(&self.territory)
    }
}

/// The full registry document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    /// Schema version tag.
    #[serde(default = "default_version")]
    pub version: String,
    /// Entries keyed by service id, in registration order.
    #[serde(default)]
    pub services: IndexMap<String, RegistryEntry>,
    /// Top-level fields this version does not know about.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn default_version() -> String {
    REGISTRY_SCHEMA_VERSION.to_string()
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: default_version(),
            services: IndexMap::new(),
            extra: IndexMap::new(),
        }
    }
}

impl Registry {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.services.get(id)
    }

    /// Entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.services.iter().map(|(id, e)| (id.as_str(), e))
    }

    /// Insert or overwrite an entry.
    ///
    /// Overwriting keeps the entry's position and merges its unknown fields
    /// under the new entry's own.
    pub fn upsert(&mut self, id: &str, mut entry: RegistryEntry) -> &RegistryEntry {
        if let Some(old) = self.services.get(id) {
            let mut extra = old.extra.clone();
            extra.extend(std::mem::take(&mut entry.extra));
            entry.extra = extra;
        }
        let (index, _) = self.services.insert_full(id.to_string(), entry);
        &self.services[index]
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<RegistryEntry> {
        self.services.shift_remove(id)
    }

    /// The first entry (in registry order) whose territory owns `path`.
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        self.services
            .iter()
            .find(|(_, e)| e.compiled_territory().owns(path))
            .map(|(id, _)| id.as_str())
    }

    /// Compile every territory once for repeated lookups.
    pub fn ownership(&self) -> OwnershipIndex {
        OwnershipIndex {
            entries: self
                .services
                .iter()
                .map(|(id, e)| (id.clone(), e.compiled_territory()))
                .collect(),
        }
    }
}

/// Precompiled territories in registry order.
#[derive(Clone, Debug, Default)]
pub struct OwnershipIndex {
    entries: Vec<(String, Territory)>,
}

impl OwnershipIndex {
    /// First owner of a root-relative path.
    pub fn owner_of(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, t)| t.owns(path))
            .map(|(id, _)| id.as_str())
    }
}
