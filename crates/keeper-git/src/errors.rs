//! Git invocation errors.

use std::time::Duration;

/// Why a git call produced no usable output.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// The git binary is not installed or not on `PATH`.
    #[error("git executable not found")]
    NotFound,

    /// The call exceeded its deadline and was killed.
    #[error("git {command} timed out after {timeout:?}")]
    Timeout {
        /// Space-joined arguments.
        command: String,
        /// Deadline that was exceeded.
        timeout: Duration,
    },

    /// git exited non-zero.
    #[error("git {command} failed (exit {code:?}): {stderr}")]
    Failed {
        /// Space-joined arguments.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error.
        stderr: String,
    },

    /// Spawning or waiting on the process failed.
    #[error("git I/O error: {0}")]
    Io(#[from] std::io::Error),
}
