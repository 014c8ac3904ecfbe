//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keep service skill documentation in sync with the code it describes.
#[derive(Parser, Debug)]
#[command(name = "skill-keeper", version, about)]
pub struct Cli {
    /// Project root. Defaults to the enclosing git repository.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Log level for stderr diagnostics (overrides settings).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved project root.
    Root,

    /// Add or replace a service entry.
    Register {
        /// Service id (registry key and default skill directory name).
        id: String,
        /// Display name. Defaults to the id.
        #[arg(long)]
        name: Option<String>,
        /// Glob owned by the service. Repeatable.
        #[arg(long = "territory", required = true)]
        territory: Vec<String>,
        /// Artifact path relative to the root.
        #[arg(long)]
        skill_path: Option<String>,
        /// One-line summary.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Remove a service entry.
    Unregister {
        /// Service id.
        id: String,
    },

    /// List registered services.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the service that owns a path.
    Find {
        /// File path, absolute or relative to the current directory.
        path: PathBuf,
    },

    /// Stamp a service's `last_sync` with the current time.
    Sync {
        /// Service id.
        id: String,
    },

    /// Report whether a modified path drifts a service's skill.
    Check {
        /// File path, absolute or relative to the current directory.
        path: PathBuf,
    },

    /// Scan for drift across the whole project.
    ///
    /// Without flags both scans run.
    Scan {
        /// Registry territories: files modified after each `last_sync`.
        #[arg(long, conflicts_with = "since")]
        since_sync: bool,
        /// Tracked memories: files touched by the last N commits.
        #[arg(long, value_name = "N")]
        since: Option<usize>,
    },

    /// Check every artifact exists and has a usable protected region.
    Health {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Re-render a skill, keeping its protected region.
    Regenerate {
        /// Service id.
        id: String,
        /// Print the merged artifact instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Add the git hook calls to `.githooks/` and activate them.
    InstallHooks {
        /// Remove the snippets instead.
        #[arg(long, conflicts_with = "status")]
        uninstall: bool,
        /// Report what is installed without changing anything.
        #[arg(long)]
        status: bool,
    },

    /// Hook entry points. These never fail the caller except on strict pre-push.
    #[command(subcommand)]
    Hook(HookCommand),
}

/// Git and agent hooks.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCommand {
    /// git pre-push: warn (or block in strict mode) on stale skills.
    PrePush {
        /// Compare every artifact against every tracked file it owns.
        #[arg(long, conflicts_with = "status")]
        check_all: bool,
        /// Like `--check-all`, but never blocks and prints a summary when clean.
        #[arg(long)]
        status: bool,
    },
    /// git pre-commit: remind to update docs when only source is staged.
    PreCommit,
    /// Agent PostToolUse: flag the skill a written file belongs to.
    PostToolUse,
    /// Agent PreToolUse: ask the agent to load the skill it is about to need.
    PreToolUse,
    /// Agent Stop: summarize drift in the working tree.
    Stop,
}

impl HookCommand {
    /// Name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::PrePush { .. } => "pre-push",
            Self::PreCommit => "pre-commit",
            Self::PostToolUse => "post-tool-use",
            Self::PreToolUse => "pre-tool-use",
            Self::Stop => "stop",
        }
    }

    /// Whether the hook consumes stdin.
    pub fn reads_stdin(self) -> bool {
        match self {
            Self::PrePush { check_all, status } => !check_all && !status,
            Self::PreCommit => false,
            Self::PostToolUse | Self::PreToolUse | Self::Stop => true,
        }
    }
}
