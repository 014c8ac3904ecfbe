//! `additionalContext` text for agent hooks, plus the memory scan report.
//!
//! Context strings are injected into the agent's prompt, so they are short:
//! a few names, a count of the rest, and one remediation hint, hard-capped at
//! [`ContextBudget::max_chars`].

use std::fmt::Write;

use keeper_core::StalenessFinding;
use keeper_core::time::{display_stamp, parse_stamp};
use keeper_drift::{DocumentDrift, OwnedFile};
use keeper_registry::RegistryEntry;

/// Size limits for context strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    /// Hard cap in characters, ellipsis included.
    pub max_chars: usize,
    /// Names listed before `(+N more)`.
    pub max_names: usize,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            max_chars: 400,
            max_names: 3,
        }
    }
}

/// Short session notice for stale registry artifacts.
pub fn render_session_context(
    findings: &[StalenessFinding],
    budget: &ContextBudget,
) -> Option<String> {
    let first = findings.first()?;
    let n = findings.len();
    let ids: Vec<&str> = findings.iter().map(|f| f.service_id.as_str()).collect();
    let noun = if n == 1 { "skill" } else { "skills" };
    let msg = format!(
        "[Skill Sync] {n} service {noun} may be stale: {}. Regenerate with `{}`{}.",
        name_list(&ids, budget.max_names),
        first.remediation,
        if n > 1 { " (likewise for the others)" } else { "" }
    );
    Some(truncate(&msg, budget.max_chars))
}

/// Short session notice for drifted memory documents.
pub fn render_memory_context(drift: &[DocumentDrift], budget: &ContextBudget) -> Option<String> {
    if drift.is_empty() {
        return None;
    }
    let names: Vec<&str> = drift.iter().map(|d| d.name.as_str()).collect();
    let msg = format!(
        "[Docs Drift] {} may need updating: {}. Run /documenting to review.",
        memories(drift.len()),
        name_list(&names, budget.max_names)
    );
    Some(truncate(&msg, budget.max_chars))
}

/// Join several notices into one context string that still fits the budget.
pub fn join_context<I>(parts: I, budget: &ContextBudget) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let joined = parts.into_iter().collect::<Vec<_>>().join("\n");
    (!joined.is_empty()).then(|| truncate(&joined, budget.max_chars))
}

/// PostToolUse notice: a written file belongs to a registered artifact.
pub fn render_drift_context(file: &OwnedFile, remediation: &str) -> String {
    let since = file
        .last_sync
        .as_deref()
        .and_then(parse_stamp)
        .map_or_else(|| "never synced".to_string(), |t| format!("last synced {}", display_stamp(t)));
    format!(
        "[Skill Sync]: Implementation drift detected in '{}'. File '{}' was modified ({since}). \
         Use '{remediation}' to sync the {} documentation.",
        file.id, file.path, file.name
    )
}

/// PreToolUse notice: load the service's skill before touching its files.
pub fn render_activation_context(id: &str, entry: &RegistryEntry) -> String {
    let mut out = format!("[Service Skill] You are about to work with the '{id}' service territory.");
    if !entry.description.is_empty() {
        let _ = write!(out, "\n  What it covers: {}", entry.description);
    }
    let _ = write!(
        out,
        "\n  Load the expert skill before proceeding: Read {}\
         \n  The skill contains operational knowledge, failure modes, diagnostic scripts \
         and the correct methods for managing this service.\
         \n  Do not improvise ad-hoc commands when the skill defines the correct method.",
        entry.skill_path
    );
    out
}

/// Full terminal report for `scan --since N`.
pub fn render_memory_report(drift: &[DocumentDrift]) -> String {
    if drift.is_empty() {
        return "[Docs Drift] All memories up to date. No action needed.".to_string();
    }
    let mut out = format!("[Drift Report] {} stale:\n\n", memories(drift.len()));
    for doc in drift {
        let _ = writeln!(out, "  {}", doc.name);
        let _ = writeln!(
            out,
            "    Last updated: {}",
            doc.updated.as_deref().unwrap_or("unknown")
        );
        for file in doc.files.iter().take(3) {
            let _ = writeln!(out, "    Modified: {file}");
        }
        let shown = doc.files.len().min(3);
        if doc.total > shown {
            let _ = writeln!(out, "    ... and {} more", doc.total - shown);
        }
        out.push('\n');
    }
    out.push_str("Run /documenting to update.");
    out
}

fn memories(n: usize) -> String {
    if n == 1 {
        "1 memory".to_string()
    } else {
        format!("{n} memories")
    }
}

/// `a, b, c (+N more)`.
fn name_list(names: &[&str], max: usize) -> String {
    let max = max.max(1);
    let mut out = names
        .iter()
        .take(max)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > max {
        let _ = write!(out, " (+{} more)", names.len() - max);
    }
    out
}

/// Cap at `max_chars` characters, ending in `…` when cut.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
