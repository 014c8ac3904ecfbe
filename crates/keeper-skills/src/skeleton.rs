//! Minimal SKILL.md template for a registry entry.

use std::fmt::Write;

use keeper_registry::RegistryEntry;

use crate::merger::Sentinels;

/// Placeholder text inside a freshly rendered protected region.
pub const REGION_PLACEHOLDER: &str =
    "_Add architecture notes, invariants and gotchas here. This block survives regeneration._";

/// Render the skeleton artifact for `id`.
///
/// The output always contains exactly one protected region holding
/// [`REGION_PLACEHOLDER`].
pub fn render(id: &str, entry: &RegistryEntry, sentinels: &Sentinels) -> String {
    let name = if entry.name.is_empty() { id } else { entry.name.as_str() };
    let description = if entry.description.trim().is_empty() {
        format!("Expert knowledge for the {name} service.")
    } else {
        entry.description.trim().to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "name: {id}");
    let _ = writeln!(out, "description: {}", single_line(&description));
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "# {name}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Overview");
    let _ = writeln!(out);
    let _ = writeln!(out, "{description}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Territory");
    let _ = writeln!(out);
    if entry.territory.is_empty() {
        let _ = writeln!(out, "_No files tracked._");
    } else {
        for pattern in &entry.territory {
            let _ = writeln!(out, "- `{pattern}`");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Expert Notes");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", sentinels.start);
    let _ = writeln!(out, "{REGION_PLACEHOLDER}");
    let _ = writeln!(out, "{}", sentinels.end);
    out
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
