//! # keeper-skills
//!
//! Everything that reads or writes a skill artifact's text.
//!
//! - [`merger`]: regenerate an artifact while keeping the human-edited
//!   region between the sentinel lines byte-for-byte
//! - [`frontmatter`]: the `---` delimited YAML-subset header
//! - [`skeleton`]: the minimal SKILL.md rendered for a registry entry
//! - [`memories`]: tracked memory documents (`tracks:` frontmatter)

#![deny(unsafe_code)]

pub mod frontmatter;
pub mod memories;
pub mod merger;
pub mod skeleton;

pub use frontmatter::{FieldValue, Frontmatter, FrontmatterError};
pub use memories::{MemoryDoc, discover};
pub use merger::{Artifact, Document, MergeError, Sentinels, merge};
