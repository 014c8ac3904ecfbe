//! Which service a pending tool call is about to touch.

use std::path::Path;

use tracing::debug;

use keeper_registry::{Registry, RegistryEntry};
use keeper_territory::normalize_path;

use crate::types::HookInput;

/// The service whose territory the tool call targets, if any.
///
/// File tools are matched by path ownership; `Bash` by the command naming a
/// service. Other tools never match.
pub fn find_service_for_tool<'a>(
    registry: &'a Registry,
    root: &Path,
    input: &HookInput,
) -> Option<(&'a str, &'a RegistryEntry)> {
    if input.is_file_tool() {
        let rel = normalize_path(input.target_path()?, root)?;
        let id = registry.owner_of(&rel)?;
        debug!(id, path = %rel, tool = %input.tool_name, "tool targets owned path");
        return registry.get(id).map(|entry| (id, entry));
    }
    if input.is_shell_tool() {
        return find_service_for_command(registry, input.command()?);
    }
    None
}

/// First service whose id, or whose name with spaces dashed, appears in
/// `command` as a whole word. Case-insensitive.
pub fn find_service_for_command<'a>(
    registry: &'a Registry,
    command: &str,
) -> Option<(&'a str, &'a RegistryEntry)> {
    let haystack = command.to_lowercase();
    registry.iter().find(|(id, entry)| {
        let dashed = entry.name.to_lowercase().replace(' ', "-");
        contains_word(&haystack, &id.to_lowercase())
            || (!dashed.is_empty() && contains_word(&haystack, &dashed))
    })
}

/// `needle` occurs in `haystack` with no alphanumeric neighbour on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
