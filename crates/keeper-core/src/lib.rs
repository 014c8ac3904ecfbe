//! # keeper-core
//!
//! Foundation types shared by every skill-keeper crate.
//!
//! - **Change records**: [`ChangeRecord`]: a changed path plus its mtime
//! - **Findings**: [`StalenessFinding`]: one stale documentation artifact
//! - **Timestamps**: [`time`] helpers that always render UTC with a `Z` suffix
//! - **Logging**: [`logging::init_subscriber`] for the stderr `tracing` writer
//!
//! Nothing in here performs I/O except the logging bootstrap and
//! [`time::modified_at`].

#![deny(unsafe_code)]

pub mod constants;
pub mod logging;
pub mod time;
pub mod types;

pub use types::{ChangeRecord, StalenessFinding};
