//! Management commands. Input and configuration errors surface as `Err`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use keeper_core::time::display_stamp;
use keeper_drift::{
    DriftCheck, FsClock, NotOwned, check_path, health, scan_documents, scan_since_sync,
};
use keeper_hooks::{render_drift_context, render_memory_report};
use keeper_skills::{discover, merge, skeleton};

use crate::cli::Command;
use crate::install::{self, InstallAction};
use crate::project::Project;

/// Exit code when a scan or health check finds problems.
pub const FOUND_PROBLEMS: u8 = 1;

/// Run a management command against a resolved project.
pub fn run(project: &Project, command: Command, cwd: &Path, out: &mut dyn Write) -> Result<u8> {
    match command {
        Command::Root => {
            writeln!(out, "{}", project.root.display())?;
            Ok(0)
        }
        Command::Register {
            id,
            name,
            territory,
            skill_path,
            description,
        } => register(project, &id, name, territory, skill_path, &description, out),
        Command::Unregister { id } => {
            if !project.store().unregister(&id)? {
                bail!("unknown service '{id}'");
            }
            writeln!(out, "✓ Unregistered: {id}")?;
            Ok(0)
        }
        Command::List { json } => list(project, json, out),
        Command::Find { path } => {
            let rel = project
                .relative(&path, cwd)
                .with_context(|| format!("{} is outside the project root", path.display()))?;
            match project.store().find_owner(&rel)? {
                Some(id) => writeln!(out, "{id}")?,
                None => writeln!(out, "{rel}: not in any territory")?,
            }
            Ok(0)
        }
        Command::Sync { id } => {
            if !project.store().mark_synced(&id)? {
                bail!("unknown service '{id}'");
            }
            writeln!(out, "✓ Synced: {id}")?;
            Ok(0)
        }
        Command::Check { path } => check(project, &path, cwd, out),
        Command::Scan { since_sync, since } => scan(project, since_sync, since, out),
        Command::Health { json } => health_cmd(project, json, out),
        Command::Regenerate { id, dry_run } => regenerate(project, &id, dry_run, out),
        Command::InstallHooks { uninstall, status } => {
            let action = if status {
                InstallAction::Status
            } else if uninstall {
                InstallAction::Uninstall
            } else {
                InstallAction::Install
            };
            install::run(&project.root, action, out)
        }
        Command::Hook(_) => bail!("hook commands are dispatched separately"),
    }
}

fn register(
    project: &Project,
    id: &str,
    name: Option<String>,
    territory: Vec<String>,
    skill_path: Option<String>,
    description: &str,
    out: &mut dyn Write,
) -> Result<u8> {
    let name = name.unwrap_or_else(|| id.to_string());
    let skill_path = skill_path.unwrap_or_else(|| project.settings.default_skill_path(id));
    let entry = project
        .store()
        .register(id, &name, territory, &skill_path, description)?;
    writeln!(
        out,
        "✓ Registered: {id} ({} pattern{}) -> {}",
        entry.territory.len(),
        if entry.territory.len() == 1 { "" } else { "s" },
        entry.skill_path
    )?;
    Ok(0)
}

fn list(project: &Project, json: bool, out: &mut dyn Write) -> Result<u8> {
    let registry = project.store().load()?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&registry.services)?)?;
        return Ok(0);
    }
    if registry.is_empty() {
        writeln!(out, "No services registered.")?;
        return Ok(0);
    }
    for (id, entry) in registry.iter() {
        let synced = entry.last_sync.as_deref().unwrap_or("never");
        writeln!(out, "{id}\t{}\t{synced}\t{}", entry.name, entry.skill_path)?;
        for pattern in &entry.territory {
            writeln!(out, "  {pattern}")?;
        }
    }
    Ok(0)
}

fn check(project: &Project, path: &Path, cwd: &Path, out: &mut dyn Write) -> Result<u8> {
    let registry = project.store().load()?;
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    match check_path(&registry, &project.root, &absolute.to_string_lossy()) {
        DriftCheck::Owned(file) => {
            let remediation = project.settings.remediation_for(&file.id);
            writeln!(out, "{}", render_drift_context(&file, &remediation))?;
        }
        DriftCheck::NotOwned(NotOwned::OutsideRoot) => {
            writeln!(out, "No drift: path is outside the project root.")?;
        }
        DriftCheck::NotOwned(NotOwned::Artifact(rel)) => {
            writeln!(out, "No drift: {rel} is a skill artifact.")?;
        }
        DriftCheck::NotOwned(NotOwned::Unowned(rel)) => {
            writeln!(out, "No drift: {rel} is not in any territory.")?;
        }
    }
    Ok(0)
}

fn scan(project: &Project, since_sync: bool, since: Option<usize>, out: &mut dyn Write) -> Result<u8> {
    let run_registry = since_sync || since.is_none();
    let run_memories = since.is_some() || !since_sync;
    let mut found = false;

    if run_registry {
        let registry = project.store().load()?;
        let drift = scan_since_sync(&registry, &project.root, &FsClock);
        if drift.is_empty() {
            writeln!(out, "[Skill Sync] No drift since last sync.")?;
        } else {
            found = true;
            let shown = project.settings.staleness.display_triggers.max(1);
            writeln!(out, "[Skill Sync] {} service(s) drifted since last sync:", drift.len())?;
            for item in &drift {
                writeln!(
                    out,
                    "  {} ({}): {} file(s) modified since {}",
                    item.id,
                    item.name,
                    item.files.len(),
                    display_stamp(item.last_sync)
                )?;
                for record in item.files.iter().take(shown) {
                    writeln!(out, "    {} ({})", record.path, display_stamp(record.modified))?;
                }
                if item.files.len() > shown {
                    writeln!(out, "    ... and {} more", item.files.len() - shown)?;
                }
                writeln!(out, "    Action: {}", project.settings.remediation_for(&item.id))?;
            }
        }
    }

    if run_memories {
        let n = since.unwrap_or(project.settings.git.recent_commits);
        let changed = project.resolver().recent(n);
        let docs = discover(&project.settings.memories_dir(&project.root));
        let drift = scan_documents(&docs, &changed);
        info!(commits = n, documents = docs.len(), drifted = drift.len(), "memory scan");
        found |= !drift.is_empty();
        writeln!(out, "{}", render_memory_report(&drift))?;
    }

    Ok(if found { FOUND_PROBLEMS } else { 0 })
}

fn health_cmd(project: &Project, json: bool, out: &mut dyn Write) -> Result<u8> {
    let registry = project.store().load()?;
    let reports = health(&registry, &project.root, &project.sentinels());
    let problems = reports.iter().filter(|r| r.status.is_problem()).count();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
    } else {
        for report in &reports {
            let mark = if report.status.is_problem() { "✗" } else { "✓" };
            writeln!(
                out,
                "{mark} {}: {} ({})",
                report.id, report.status, report.skill_path
            )?;
        }
        writeln!(out, "{} artifact(s), {problems} need attention.", reports.len())?;
    }
    Ok(if problems > 0 { FOUND_PROBLEMS } else { 0 })
}

fn regenerate(project: &Project, id: &str, dry_run: bool, out: &mut dyn Write) -> Result<u8> {
    let store = project.store();
    let entry = store
        .get(id)?
        .with_context(|| format!("unknown service '{id}'"))?;
    let sentinels = project.sentinels();
    let path = project.root.join(&entry.skill_path);

    let existing = match std::fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    let fresh = skeleton::render(id, &entry, &sentinels);
    let merged = merge(existing.as_deref(), &fresh, &sentinels)
        .with_context(|| format!("refusing to regenerate {}", path.display()))?;

    if dry_run {
        write!(out, "{merged}")?;
        return Ok(0);
    }
    write_atomic(&path, &merged)?;
    let _ = store.mark_synced(id)?;
    info!(id, path = %path.display(), preserved = existing.is_some(), "artifact regenerated");
    writeln!(
        out,
        "✓ Regenerated: {} ({})",
        entry.skill_path,
        if existing.is_some() { "protected region kept" } else { "created" }
    )?;
    Ok(0)
}

/// Replace `path` via a sibling temp file and rename.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    let _ = tmp
        .persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
