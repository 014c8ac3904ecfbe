//! # keeper-drift
//!
//! The staleness engine and its sibling checks.
//!
//! - [`evaluate`]: change set + registry → [`StalenessFinding`]s, in registry order
//! - [`check_path`]: ownership of a single just-written file
//! - [`scan_since_sync`]: territory files modified after each entry's `last_sync`
//! - [`health`]: per-entry artifact status (healthy / missing / invalid)
//! - [`scan_documents`]: drift for tracked memory documents
//!
//! File times come from a [`FileClock`] so the engine can be exercised
//! without touching the filesystem.
//!
//! [`StalenessFinding`]: keeper_core::StalenessFinding

#![deny(unsafe_code)]

pub mod check;
pub mod clock;
pub mod documents;
pub mod engine;
pub mod health;
pub mod scan;

pub use check::{DriftCheck, NotOwned, OwnedFile, check_path};
pub use clock::{FileClock, FsClock};
pub use documents::{DocumentDrift, MAX_LISTED_FILES, scan_documents};
pub use engine::{EvalContext, evaluate, is_globally_triggered};
pub use health::{HealthReport, HealthStatus, health};
pub use scan::{SyncDrift, scan_since_sync};
