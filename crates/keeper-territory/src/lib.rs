//! # keeper-territory
//!
//! Decides which documentation artifact "owns" a project file.
//!
//! A territory is an ordered list of glob patterns relative to the project
//! root. Matching is segment-aware: `*`, `?` and `[..]` never cross a `/`,
//! while a `**` segment consumes zero or more whole segments.
//!
//! On top of strict glob semantics, a directory-prefix fallback applies:
//! `dir/**` and `dir/**/*` own `dir` itself and everything beneath it, and
//! a pattern with no wildcards does the same. Filtered patterns such as
//! `cli/src/**/*.ts` get no fallback.
//!
//! Every function here is pure: no I/O, no hidden state.

#![deny(unsafe_code)]

pub mod path;
pub mod territory;

pub use path::normalize_path;
pub use territory::{Territory, matches, matches_in_root};
