//! Resolved project: root plus settings, passed explicitly to every command.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use keeper_drift::{EvalContext, FileClock};
use keeper_git::{ChangeSetResolver, SystemGit, discover_root};
use keeper_hooks::{AdvisoryStyle, ContextBudget};
use keeper_registry::RegistryStore;
use keeper_settings::{KeeperSettings, load_settings};
use keeper_skills::Sentinels;
use keeper_territory::normalize_path;

/// One project the command operates on.
#[derive(Debug)]
pub struct Project {
    /// Absolute project root.
    pub root: PathBuf,
    /// Effective settings (defaults, file, env).
    pub settings: KeeperSettings,
}

impl Project {
    /// Resolve the root (explicit, else the git top level above `cwd`) and
    /// load its settings.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let root = match explicit {
            Some(root) => {
                let root = if root.is_absolute() {
                    root.to_path_buf()
                } else {
                    cwd.join(root)
                };
                if !root.is_dir() {
                    bail!("project root is not a directory: {}", root.display());
                }
                root
            }
            None => discover_root(&SystemGit::default(), cwd).with_context(|| {
                format!(
                    "no git repository above {}; pass --root to choose a project",
                    cwd.display()
                )
            })?,
        };
        let settings = load_settings(&root)
            .with_context(|| format!("failed to load settings under {}", root.display()))?;
        debug!(root = %root.display(), "project resolved");
        Ok(Self { root, settings })
    }

    /// Registry store at the configured path.
    pub fn store(&self) -> RegistryStore {
        RegistryStore::new(self.settings.registry_path(&self.root))
    }

    /// Change-set resolver bounded by the configured git timeout.
    pub fn resolver(&self) -> ChangeSetResolver<SystemGit> {
        let git = SystemGit::new(Duration::from_millis(self.settings.git.timeout_ms));
        ChangeSetResolver::new(git, &self.root)
    }

    /// Protected-region markers.
    pub fn sentinels(&self) -> Sentinels {
        Sentinels::new(&self.settings.sentinels.start, &self.settings.sentinels.end)
    }

    /// Engine inputs for this project.
    pub fn eval_context<'a>(&'a self, clock: &'a dyn FileClock) -> EvalContext<'a> {
        EvalContext::new(&self.root, clock)
            .with_max_triggers(self.settings.staleness.max_triggers)
            .with_remediation(self.settings.staleness.remediation.clone())
    }

    /// Advisory rendering. Colour also requires stdout to be a terminal.
    pub fn advisory_style(&self, strict: bool) -> AdvisoryStyle {
        AdvisoryStyle {
            strict,
            color: self.color(),
            display_triggers: self.settings.staleness.display_triggers,
        }
    }

    /// Whether to emit ANSI colour.
    pub fn color(&self) -> bool {
        self.settings.hooks.color && std::io::stdout().is_terminal()
    }

    /// Agent-context size limits.
    pub fn budget(&self) -> ContextBudget {
        ContextBudget {
            max_chars: self.settings.context.max_chars,
            max_names: self.settings.context.max_names,
        }
    }

    /// Root-relative form of a user-supplied path (relative to `cwd`).
    pub fn relative(&self, path: &Path, cwd: &Path) -> Option<String> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        normalize_path(&absolute.to_string_lossy(), &self.root)
    }
}
