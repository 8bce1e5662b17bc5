//! Hook matching and preview execution.
//!
//! Settings map event types to ordered [`HookEntry`] lists. The matcher picks
//! the entries whose pattern applies to an event's tool name, and the
//! [`HookEngine`] runs their commands in preview mode.

pub mod engine;
pub mod matcher;
pub mod scenarios;
pub mod settings;
mod types;

pub use engine::{HookEngine, ScenarioRun};
pub use matcher::{match_entries, match_tool_name, matched_commands, primary_command, MatchResult};
pub use scenarios::Scenario;
pub use settings::{load_settings, parse_settings, HookSettings};
pub use types::{HookCommand, HookEntry, HookEventType, ToolCallEvent, MATCH_ALL};
