//! Package-level constants.

/// Current version of skill-keeper (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "skill-keeper";

/// Schema version written into fresh registries.
pub const REGISTRY_SCHEMA_VERSION: &str = "1.0";

/// Git's "no object" revision, sent by pre-push for new or deleted refs.
pub const NULL_SHA: &str = "0000000000000000000000000000000000000000";

/// File name of the primary skill artifact.
pub const SKILL_MD_FILENAME: &str = "SKILL.md";

/// Environment variable that turns the pre-push advisory into a block.
pub const STRICT_ENV_VAR: &str = "SKILL_HOOK_STRICT";
