//! # keeper-settings
//!
//! Configuration management with layered sources for skill-keeper.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`KeeperSettings::default()`]
//! 2. **Project file**: `<root>/.claude/skills/keeper.json` (deep-merged over defaults)
//! 3. **Environment variables**: `SKILL_HOOK_STRICT`, `KEEPER_*`, `NO_COLOR`
//!
//! There is no global instance: callers load settings once per invocation
//! and pass them down explicitly.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
