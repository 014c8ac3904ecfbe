//! `install-hooks`: wire the git hooks into `.githooks/` and `.git/hooks/`.
//!
//! Each hook file gets one marked snippet. Installing twice is a no-op and
//! uninstalling removes exactly the snippet that was added.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::commands::write_atomic;

/// Versioned hook directory, shared with the team.
const SHARED_DIR: &str = ".githooks";

/// A git hook and the snippet that calls into `skill-keeper`.
struct HookSnippet {
    file: &'static str,
    label: &'static str,
    marker: &'static str,
    body: &'static str,
}

const PRE_COMMIT: HookSnippet = HookSnippet {
    file: "pre-commit",
    label: "doc-reminder",
    marker: "# [skill-keeper] doc-reminder",
    body: "if command -v skill-keeper >/dev/null 2>&1; then\n    skill-keeper hook pre-commit || true\nfi\n",
};

// stdin (the pushed refs) flows through to the first command that reads it
const PRE_PUSH: HookSnippet = HookSnippet {
    file: "pre-push",
    label: "skill-staleness",
    marker: "# [skill-keeper] skill-staleness",
    body: "if command -v skill-keeper >/dev/null 2>&1; then\n    skill-keeper hook pre-push || exit 1\nfi\n",
};

const SNIPPETS: [&HookSnippet; 2] = [&PRE_COMMIT, &PRE_PUSH];

impl HookSnippet {
    fn text(&self) -> String {
        format!("\n{}\n{}", self.marker, self.body)
    }
}

/// What `install-hooks` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    /// Add missing snippets and activate.
    Install,
    /// Remove snippets and re-activate.
    Uninstall,
    /// Report only.
    Status,
}

/// Run `install-hooks` in `root`.
pub fn run(root: &Path, action: InstallAction, out: &mut dyn Write) -> Result<u8> {
    let git_hooks = root.join(".git").join("hooks");
    if !root.join(".git").is_dir() {
        bail!("{} is not a git repository (no .git/ directory)", root.display());
    }
    let shared = root.join(SHARED_DIR);

    match action {
        InstallAction::Status => status(&shared, &git_hooks, out)?,
        InstallAction::Install => {
            let mut changed = false;
            for snippet in SNIPPETS {
                changed |= install(&shared.join(snippet.file), snippet, out)?;
            }
            if changed {
                activate(&shared, &git_hooks, out)?;
            }
            writeln!(out, "Override strict mode: SKILL_HOOK_STRICT=1 git push")?;
            writeln!(out, "Bypass hooks:         git commit --no-verify / git push --no-verify")?;
        }
        InstallAction::Uninstall => {
            let mut changed = false;
            for snippet in SNIPPETS {
                changed |= uninstall(&shared.join(snippet.file), snippet, out)?;
            }
            if changed {
                activate(&shared, &git_hooks, out)?;
            }
        }
    }
    Ok(0)
}

fn read(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn install(path: &Path, snippet: &HookSnippet, out: &mut dyn Write) -> Result<bool> {
    let content = read(path)?.unwrap_or_else(|| "#!/usr/bin/env bash\n".to_string());
    if content.contains(snippet.marker) {
        writeln!(out, "○ {} already installed in {}", snippet.label, display(path))?;
        return Ok(false);
    }
    let mut updated = content;
    if !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&snippet.text());
    write_hook(path, &updated)?;
    info!(hook = snippet.file, "installed hook snippet");
    writeln!(out, "✓ {} added to {}", snippet.label, display(path))?;
    Ok(true)
}

fn uninstall(path: &Path, snippet: &HookSnippet, out: &mut dyn Write) -> Result<bool> {
    let Some(content) = read(path)?.filter(|c| c.contains(snippet.marker)) else {
        writeln!(out, "○ {} not present in {}", snippet.label, display(path))?;
        return Ok(false);
    };
    let text = snippet.text();
    let updated = if content.contains(&text) {
        content.replace(&text, "")
    } else {
        // hand-edited: drop the marker and leave the rest to the user
        content.replace(snippet.marker, "")
    };
    write_hook(path, &updated)?;
    info!(hook = snippet.file, "removed hook snippet");
    writeln!(out, "✓ {} removed from {}", snippet.label, display(path))?;
    Ok(true)
}

/// Copy the shared hooks into `.git/hooks/`, executable.
fn activate(shared: &Path, git_hooks: &Path, out: &mut dyn Write) -> Result<()> {
    for snippet in SNIPPETS {
        let Some(content) = read(&shared.join(snippet.file))? else {
            continue;
        };
        let dest = git_hooks.join(snippet.file);
        write_hook(&dest, &content)?;
        writeln!(out, "✓ Activated {}", display(&dest))?;
    }
    Ok(())
}

fn status(shared: &Path, git_hooks: &Path, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Skill hook status:")?;
    for snippet in SNIPPETS {
        let installed = read(&shared.join(snippet.file))?.is_some_and(|c| c.contains(snippet.marker));
        writeln!(
            out,
            "  {:<12} {:<16} {}",
            snippet.file,
            snippet.label,
            if installed { "INSTALLED" } else { "NOT INSTALLED" }
        )?;
    }
    writeln!(out, "Active git hooks (.git/hooks/):")?;
    for snippet in SNIPPETS {
        let present = git_hooks.join(snippet.file).exists();
        writeln!(out, "  {:<12} {}", snippet.file, if present { "present" } else { "MISSING" })?;
    }
    Ok(())
}

fn write_hook(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content)?;
    make_executable(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Last two components, e.g. `.githooks/pre-push`.
fn display(path: &Path) -> String {
    let parts: Vec<_> = path.components().rev().take(2).collect();
    parts
        .into_iter()
        .rev()
        .collect::<PathBuf>()
        .display()
        .to_string()
}
