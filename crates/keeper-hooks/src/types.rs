//! Wire types for agent hooks.
//!
//! The host sends snake_case input and expects camelCase output. Both sides
//! are lenient: missing input fields default to empty, and an unknown event
//! name deserializes to [`HookEvent::Other`] instead of failing.

use serde::{Deserialize, Serialize};

/// Tools whose input names a file or directory.
pub const FILE_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "Glob",
    "Grep",
    "NotebookRead",
    "NotebookEdit",
];

/// Tools that modify the file they name.
pub const WRITE_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

/// Tool whose input is a shell command.
pub const SHELL_TOOL: &str = "Bash";

/// Agent lifecycle event a hook was invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    /// Before a tool runs.
    PreToolUse,
    /// After a tool ran.
    PostToolUse,
    /// The agent is about to stop.
    Stop,
    /// Any event this tool does not handle.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreToolUse => write!(f, "PreToolUse"),
            Self::PostToolUse => write!(f, "PostToolUse"),
            Self::Stop => write!(f, "Stop"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Arguments of the tool call, reduced to the fields hooks look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolInput {
    /// `Read`/`Write`/`Edit` target.
    pub file_path: Option<String>,
    /// `Glob`/`Grep` search root.
    pub path: Option<String>,
    /// Notebook tools' target.
    pub notebook_path: Option<String>,
    /// `Bash` command line.
    pub command: Option<String>,
}

/// One hook invocation as read from stdin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookInput {
    /// Event name; absent when the host omits it.
    pub hook_event_name: Option<HookEvent>,
    /// Tool name, empty for non-tool events.
    pub tool_name: String,
    /// Tool arguments.
    pub tool_input: ToolInput,
    /// Working directory of the agent session.
    pub cwd: Option<String>,
}

impl HookInput {
    /// Parse one JSON object.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Whether the tool operates on a path.
    pub fn is_file_tool(&self) -> bool {
        FILE_TOOLS.contains(&self.tool_name.as_str())
    }

    /// Whether the tool modifies a file. An unnamed tool counts as one.
    pub fn is_write_tool(&self) -> bool {
        self.tool_name.is_empty() || WRITE_TOOLS.contains(&self.tool_name.as_str())
    }

    /// Whether the tool runs a shell command.
    pub fn is_shell_tool(&self) -> bool {
        self.tool_name == SHELL_TOOL
    }

    /// First non-empty of `file_path`, `path`, `notebook_path`.
    pub fn target_path(&self) -> Option<&str> {
        let input = &self.tool_input;
        [&input.file_path, &input.path, &input.notebook_path]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|p| !p.is_empty())
    }

    /// Non-empty shell command.
    pub fn command(&self) -> Option<&str> {
        self.tool_input.command.as_deref().filter(|c| !c.is_empty())
    }
}

/// Event-specific part of a hook answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    /// Echo of the event being answered.
    pub hook_event_name: HookEvent,
    /// Text injected into the agent's context.
    pub additional_context: String,
}

/// The single JSON object a hook may print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    /// Payload.
    pub hook_specific_output: HookSpecificOutput,
}

impl HookOutput {
    /// Answer `event` with extra context for the agent.
    pub fn context(event: HookEvent, additional_context: impl Into<String>) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event,
                additional_context: additional_context.into(),
            },
        }
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
