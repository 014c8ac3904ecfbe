//! # keeper-registry
//!
//! The persisted mapping from service identifier to tracking metadata.
//!
//! - [`Registry`] / [`RegistryEntry`]: the typed JSON document, order-preserving,
//!   with unknown fields carried through untouched
//! - [`RegistryStore`]: load, atomic save, and the read-modify-write
//!   operations (`register`, `unregister`, `mark_synced`, ...)
//! - [`OwnershipIndex`]: territories compiled once for repeated lookups
//!
//! Each mutating call is one full cycle: read the file, change it in memory,
//! write it back through a temp file and rename. Concurrent writers race
//! with last-writer-wins.

#![deny(unsafe_code)]

pub mod errors;
pub mod store;
pub mod types;

pub use errors::{RegistryError, Result};
pub use store::RegistryStore;
pub use types::{OwnershipIndex, Registry, RegistryEntry};
