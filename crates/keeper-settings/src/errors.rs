//! Errors raised while loading `keeper.json`.

use std::path::PathBuf;

use thiserror::Error;

/// Why the settings for a project could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Read {
        /// Settings file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not JSON.
    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        /// Settings file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The file is JSON but a value has the wrong shape, e.g. a string
    /// where `git.timeoutMs` expects a number.
    #[error("settings file {path} has an invalid value: {source}")]
    Invalid {
        /// Settings file.
        path: PathBuf,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// The compiled defaults could not be turned into JSON for merging.
    #[error("failed to encode default settings: {0}")]
    Defaults(#[from] serde_json::Error),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
