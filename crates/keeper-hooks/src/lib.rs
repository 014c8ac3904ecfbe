//! # keeper-hooks
//!
//! Everything a hook prints.
//!
//! Git hooks ([`advisory`]) write plain text to stdout, optionally coloured.
//! Agent hooks read one [`HookInput`] from stdin and answer with at most one
//! [`HookOutput`] whose `additionalContext` comes from [`context`].
//! [`activation`] decides which service a pending tool call is about to touch.
//!
//! Nothing here decides staleness or exits the process; callers pass in
//! findings and own the exit code.

#![deny(unsafe_code)]

pub mod activation;
pub mod advisory;
pub mod context;
pub mod types;

pub use activation::{find_service_for_command, find_service_for_tool};
pub use advisory::{
    AdvisoryStyle, doc_reminder_paths, render_advisory, render_doc_reminder, render_status_summary,
};
pub use context::{
    ContextBudget, join_context, render_activation_context, render_drift_context, render_memory_context,
    render_memory_report, render_session_context,
};
pub use types::{HookEvent, HookInput, HookOutput, ToolInput};
