//! # keeper-git
//!
//! Computes change sets (sets of root-relative paths) from git.
//!
//! - [`GitRunner`]: the subprocess seam; [`SystemGit`] enforces a hard timeout
//! - [`ChangeSetResolver`]: range, recent-N, working-tree, staged and tracked modes
//! - [`parse_push_ranges`]: the pre-push stdin protocol
//!
//! Resolver modes never fail. Any git error is logged at `debug` and the
//! mode returns an empty set, so a missing binary or a timeout reads as
//! "nothing changed".

#![deny(unsafe_code)]

pub mod errors;
pub mod push;
pub mod resolver;
pub mod runner;

pub use errors::GitError;
pub use push::{PushRange, parse_push_ranges};
pub use resolver::{ChangeSetResolver, discover_root};
pub use runner::{DEFAULT_TIMEOUT, GitRunner, SystemGit};
