//! Registry error types.

use std::path::PathBuf;

/// Errors raised while reading or writing the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Filesystem failure reading or writing the registry.
    #[error("registry I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The registry file exists but is not a valid registry document.
    #[error("registry file {path} is corrupt: {source}")]
    Corrupt {
        /// Registry file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the in-memory registry failed.
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Renaming the temp file over the registry failed.
    #[error("failed to replace registry file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// A service identifier that cannot name a registry entry.
    #[error("invalid service id {0:?}: must be non-empty and contain no path separators or whitespace")]
    InvalidId(String),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_display_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RegistryError::Corrupt {
            path: PathBuf::from("/repo/registry.json"),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("/repo/registry.json"));
        assert!(msg.contains("corrupt"));
    }

    #[test]
    fn invalid_id_display() {
        let err = RegistryError::InvalidId("a/b".into());
        assert!(err.to_string().contains("\"a/b\""));
    }
}
