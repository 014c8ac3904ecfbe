//! Modification-time source.

use std::path::Path;

use chrono::{DateTime, Utc};

use keeper_core::time::modified_at;

/// Looks up when a file was last modified.
pub trait FileClock {
    /// Modification instant of `path`, or `None` if it does not exist.
    fn modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// Reads modification times from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsClock;

impl FileClock for FsClock {
    fn modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        modified_at(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_clock_reads_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(FsClock.modified(file.path()).is_some());
    }

    #[test]
    fn fs_clock_missing_is_none() {
        assert!(FsClock.modified(Path::new("/no/such/file")).is_none());
    }
}
