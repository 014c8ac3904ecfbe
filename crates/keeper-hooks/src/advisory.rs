//! Plain-text git hook output.

use std::fmt::Write;

use keeper_core::StalenessFinding;
use keeper_core::constants::STRICT_ENV_VAR;
use keeper_core::time::{display_stamp, parse_stamp};

const SKILL_TAG: &str = "[skill-hook]";
const DOC_TAG: &str = "[doc-hook]";

/// How the pre-push advisory is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryStyle {
    /// Strict mode: the push is blocked.
    pub strict: bool,
    /// Emit ANSI colours.
    pub color: bool,
    /// Triggers printed per finding.
    pub display_triggers: usize,
}

impl Default for AdvisoryStyle {
    fn default() -> Self {
        Self {
            strict: false,
            color: false,
            display_triggers: 3,
        }
    }
}

/// ANSI escapes, or empty strings when colour is off.
#[derive(Clone, Copy)]
struct Palette {
    yellow: &'static str,
    red: &'static str,
    blue: &'static str,
    reset: &'static str,
}

impl Palette {
    fn new(color: bool) -> Self {
        if color {
            Self {
                yellow: "\x1b[1;33m",
                red: "\x1b[0;31m",
                blue: "\x1b[0;34m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                yellow: "",
                red: "",
                blue: "",
                reset: "",
            }
        }
    }
}

/// The pre-push staleness block. Empty when there are no findings.
pub fn render_advisory(findings: &[StalenessFinding], style: &AdvisoryStyle) -> String {
    if findings.is_empty() {
        return String::new();
    }
    let Palette {
        yellow,
        red,
        blue,
        reset,
    } = Palette::new(style.color);

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{yellow}{SKILL_TAG} ⚠  The following service skills may be stale:{reset}"
    );
    for finding in findings {
        let _ = writeln!(
            out,
            "{yellow}  {} ({}): {} older than changed source{reset}",
            finding.service_id, finding.name, finding.skill_path
        );
        let last_sync = finding
            .last_sync
            .as_deref()
            .and_then(parse_stamp)
            .map_or_else(|| "never".to_string(), display_stamp);
        let _ = writeln!(out, "    Last sync: {last_sync}");
        let _ = writeln!(
            out,
            "    Artifact:  {}",
            display_stamp(finding.artifact_modified)
        );
        let shown = style.display_triggers.max(1);
        for trigger in finding.triggers.iter().take(shown) {
            let _ = writeln!(
                out,
                "    Trigger:   {} ({})",
                trigger.path,
                display_stamp(trigger.modified)
            );
        }
        if finding.triggers.len() > shown {
            let _ = writeln!(out, "               ... and {} more", finding.triggers.len() - shown);
        }
        let _ = writeln!(out, "    Action:    {}", finding.remediation);
    }
    let _ = writeln!(out);

    if style.strict {
        let _ = writeln!(
            out,
            "{red}{SKILL_TAG} {STRICT_ENV_VAR}=1: blocking push until skills are updated.{reset}"
        );
        let _ = writeln!(out, "{SKILL_TAG} Bypass: git push --no-verify");
    } else {
        let _ = writeln!(
            out,
            "{blue}{SKILL_TAG} Set {STRICT_ENV_VAR}=1 to block pushes on staleness.{reset}"
        );
    }
    let _ = writeln!(out);
    out
}

/// One-line summary for `hook pre-push --status` when nothing is stale.
pub fn render_status_summary(checked: usize) -> String {
    match checked {
        0 => format!("{SKILL_TAG} No service skills registered."),
        1 => format!("{SKILL_TAG} ✓ 1 service skill checked, all skills fresh."),
        n => format!("{SKILL_TAG} ✓ {n} service skills checked, all skills fresh."),
    }
}

/// Staged source paths that warrant a documentation reminder.
///
/// Empty when no staged path is under `source_paths`, or when any staged
/// path is under `ssot_paths` (documentation was already touched).
pub fn doc_reminder_paths<S: AsRef<str>>(
    staged: &[String],
    source_paths: &[S],
    ssot_paths: &[S],
) -> Vec<String> {
    let under = |file: &str, prefixes: &[S]| prefixes.iter().any(|p| file.starts_with(p.as_ref()));
    if staged.iter().any(|f| under(f, ssot_paths)) {
        return Vec::new();
    }
    staged
        .iter()
        .filter(|f| under(f, source_paths))
        .cloned()
        .collect()
}

/// The pre-commit reminder. Empty when `source_changed` is empty.
pub fn render_doc_reminder(source_changed: &[String], max_listed: usize, color: bool) -> String {
    if source_changed.is_empty() {
        return String::new();
    }
    let Palette {
        yellow,
        blue,
        reset,
        ..
    } = Palette::new(color);

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{yellow}{DOC_TAG} ⚠  Source changes staged without SSOT updates.{reset}"
    );
    let _ = writeln!(
        out,
        "{blue}{DOC_TAG}    If this commit changes behavior or architecture, run /documenting first.{reset}"
    );
    let _ = writeln!(out, "{DOC_TAG}    Changed source paths:");
    for file in source_changed.iter().take(max_listed) {
        let _ = writeln!(out, "{DOC_TAG}      - {file}");
    }
    if source_changed.len() > max_listed {
        let _ = writeln!(
            out,
            "{DOC_TAG}      ... and {} more",
            source_changed.len() - max_listed
        );
    }
    let _ = writeln!(
        out,
        "{DOC_TAG}    Commit proceeds. This is a reminder, not a block."
    );
    let _ = writeln!(out);
    out
}
