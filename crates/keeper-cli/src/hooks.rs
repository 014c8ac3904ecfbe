//! Hook entry points.
//!
//! Each hook runs an inner function returning [`HookExit`]; [`run`] is the
//! boundary that turns any error into a logged warning and exit 0. Only a
//! strict pre-push with stale findings exits 1.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use keeper_drift::{DriftCheck, FsClock, check_path, evaluate, is_globally_triggered, scan_documents};
use keeper_git::{ChangeSetResolver, GitRunner, parse_push_ranges};
use keeper_hooks::{
    HookEvent, HookInput, HookOutput, doc_reminder_paths, find_service_for_tool,
    render_activation_context, render_advisory, render_doc_reminder, render_drift_context,
    join_context, render_memory_context, render_session_context, render_status_summary,
};
use keeper_skills::discover;

use crate::cli::HookCommand;
use crate::project::Project;

/// Outcome of a hook that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookExit {
    /// Nothing to report.
    Clean,
    /// Something was printed; the caller proceeds.
    Advisory,
    /// Strict mode: the caller must stop.
    Block,
}

impl HookExit {
    /// Process exit code.
    pub fn code(self) -> u8 {
        match self {
            Self::Clean | Self::Advisory => 0,
            Self::Block => 1,
        }
    }
}

/// How pre-push builds its change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// The pushed ranges from stdin.
    Ranges,
    /// Every tracked file, blocking in strict mode.
    CheckAll,
    /// Every tracked file, never blocking.
    Status,
}

/// Run a hook, never failing the caller on internal errors.
pub fn run(
    command: HookCommand,
    explicit_root: Option<&Path>,
    cwd: &Path,
    stdin: &str,
    out: &mut dyn Write,
) -> u8 {
    match dispatch(command, explicit_root, cwd, stdin, out) {
        Ok(exit) => {
            debug!(hook = command.name(), ?exit, "hook finished");
            exit.code()
        }
        Err(e) => {
            warn!(hook = command.name(), error = %format!("{e:#}"), "hook failed, continuing");
            0
        }
    }
}

fn dispatch(
    command: HookCommand,
    explicit_root: Option<&Path>,
    cwd: &Path,
    stdin: &str,
    out: &mut dyn Write,
) -> Result<HookExit> {
    match command {
        HookCommand::PrePush { check_all, status } => {
            let mode = if status {
                PushMode::Status
            } else if check_all {
                PushMode::CheckAll
            } else {
                PushMode::Ranges
            };
            let project = Project::resolve(explicit_root, cwd)?;
            pre_push(&project, &project.resolver(), stdin, mode, out)
        }
        HookCommand::PreCommit => {
            let project = Project::resolve(explicit_root, cwd)?;
            pre_commit(&project, &project.resolver(), out)
        }
        HookCommand::PostToolUse | HookCommand::PreToolUse | HookCommand::Stop => {
            let input = HookInput::from_json(stdin).context("invalid hook input")?;
            let session_cwd = input.cwd.as_deref().map_or_else(|| cwd.to_path_buf(), PathBuf::from);
            let project = Project::resolve(explicit_root, &session_cwd)?;
            match command {
                HookCommand::PostToolUse => post_tool_use(&project, &input, out),
                HookCommand::PreToolUse => pre_tool_use(&project, &input, out),
                _ => stop(&project, &project.resolver(), out),
            }
        }
    }
}

/// Staleness of the pushed (or all tracked) files.
pub fn pre_push<R: GitRunner>(
    project: &Project,
    resolver: &ChangeSetResolver<R>,
    stdin: &str,
    mode: PushMode,
    out: &mut dyn Write,
) -> Result<HookExit> {
    let registry = project.store().load()?;
    let changed: BTreeSet<String> = match mode {
        PushMode::Ranges => {
            let ranges = parse_push_ranges(stdin);
            if ranges.is_empty() {
                debug!("no ranges to check");
                return Ok(HookExit::Clean);
            }
            ranges
                .iter()
                .flat_map(|r| resolver.range(&r.old, &r.new))
                .collect()
        }
        PushMode::CheckAll | PushMode::Status => resolver.tracked(),
    };

    let globals = &project.settings.staleness.global_triggers;
    let global_active = mode == PushMode::Ranges && is_globally_triggered(&changed, globals);
    let clock = FsClock;
    let findings = evaluate(
        &registry,
        &changed,
        globals,
        global_active,
        &project.eval_context(&clock),
    );
    info!(
        changed = changed.len(),
        stale = findings.len(),
        global_active,
        "pre-push evaluated"
    );

    if findings.is_empty() {
        if mode == PushMode::Status {
            writeln!(out, "{}", render_status_summary(registry.len()))?;
        }
        return Ok(HookExit::Clean);
    }

    let strict = mode != PushMode::Status && project.settings.hooks.strict;
    write!(out, "{}", render_advisory(&findings, &project.advisory_style(strict)))?;
    Ok(if strict {
        HookExit::Block
    } else {
        HookExit::Advisory
    })
}

/// Documentation reminder for staged source without staged docs.
pub fn pre_commit<R: GitRunner>(
    project: &Project,
    resolver: &ChangeSetResolver<R>,
    out: &mut dyn Write,
) -> Result<HookExit> {
    let staged: Vec<String> = resolver.staged().into_iter().collect();
    let reminder = &project.settings.reminder;
    let paths = doc_reminder_paths(&staged, &reminder.source_paths, &reminder.ssot_paths);
    if paths.is_empty() {
        return Ok(HookExit::Clean);
    }
    write!(
        out,
        "{}",
        render_doc_reminder(&paths, reminder.max_listed, project.color())
    )?;
    Ok(HookExit::Advisory)
}

/// Flag the skill a just-written file belongs to.
pub fn post_tool_use(project: &Project, input: &HookInput, out: &mut dyn Write) -> Result<HookExit> {
    if !input.is_write_tool() {
        return Ok(HookExit::Clean);
    }
    let Some(path) = input.target_path() else {
        return Ok(HookExit::Clean);
    };
    let registry = project.store().load()?;
    match check_path(&registry, &project.root, path) {
        DriftCheck::Owned(file) => {
            let remediation = project.settings.remediation_for(&file.id);
            let msg = render_drift_context(&file, &remediation);
            emit(out, HookEvent::PostToolUse, msg)
        }
        DriftCheck::NotOwned(reason) => {
            debug!(path, ?reason, "write needs no skill update");
            Ok(HookExit::Clean)
        }
    }
}

/// Ask the agent to load the skill for the territory it is about to touch.
pub fn pre_tool_use(project: &Project, input: &HookInput, out: &mut dyn Write) -> Result<HookExit> {
    let registry = project.store().load()?;
    match find_service_for_tool(&registry, &project.root, input) {
        Some((id, entry)) => emit(out, HookEvent::PreToolUse, render_activation_context(id, entry)),
        None => Ok(HookExit::Clean),
    }
}

/// Summarize drift in the working tree for memories and registry skills.
pub fn stop<R: GitRunner>(
    project: &Project,
    resolver: &ChangeSetResolver<R>,
    out: &mut dyn Write,
) -> Result<HookExit> {
    let changed = resolver.working_tree();
    if changed.is_empty() {
        return Ok(HookExit::Clean);
    }
    let budget = project.budget();
    let mut parts = Vec::new();

    let docs = discover(&project.settings.memories_dir(&project.root));
    let drifted = scan_documents(&docs, &changed);
    parts.extend(render_memory_context(&drifted, &budget));

    let registry = project.store().load()?;
    let globals = &project.settings.staleness.global_triggers;
    let clock = FsClock;
    let findings = evaluate(
        &registry,
        &changed,
        globals,
        is_globally_triggered(&changed, globals),
        &project.eval_context(&clock),
    );
    parts.extend(render_session_context(&findings, &budget));

    match join_context(parts, &budget) {
        Some(context) => emit(out, HookEvent::Stop, context),
        None => Ok(HookExit::Clean),
    }
}

fn emit(out: &mut dyn Write, event: HookEvent, context: String) -> Result<HookExit> {
    writeln!(out, "{}", HookOutput::context(event, context).to_json()?)?;
    Ok(HookExit::Advisory)
}
