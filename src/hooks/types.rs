//! Hook configuration and event shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::HookError;

/// Matcher used when a settings entry omits one.
pub const MATCH_ALL: &str = ".*";

/// Lifecycle point a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HookEventType {
    SessionStart,
    UserPromptSubmit,
    PreToolUse,
    PostToolUse,
    PreCompact,
}

impl HookEventType {
    pub const ALL: [HookEventType; 5] = [
        Self::SessionStart,
        Self::UserPromptSubmit,
        Self::PreToolUse,
        Self::PostToolUse,
        Self::PreCompact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionStart => "SessionStart",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::PreCompact => "PreCompact",
        }
    }

    /// Whether events of this type carry a tool name for matchers to test.
    pub fn is_tool_scoped(self) -> bool {
        matches!(self, Self::PreToolUse | Self::PostToolUse)
    }
}

impl fmt::Display for HookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEventType {
    type Err = HookError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| HookError::UnknownEventType(trimmed.to_string()))
    }
}

/// One shell command attached to a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCommand {
    /// Always `command` in current settings files.
    #[serde(rename = "type", default = "default_command_kind")]
    pub kind: String,
    pub command: String,
    /// Per-command timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

fn default_command_kind() -> String {
    "command".to_string()
}

impl HookCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            kind: default_command_kind(),
            command: command.into(),
            timeout: None,
        }
    }
}

/// A matcher pattern and the ordered hooks it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookEntry {
    #[serde(default = "default_matcher")]
    pub matcher: String,
    #[serde(default)]
    pub hooks: Vec<HookCommand>,
}

fn default_matcher() -> String {
    MATCH_ALL.to_string()
}

impl HookEntry {
    pub fn new(matcher: impl Into<String>, commands: &[&str]) -> Self {
        Self {
            matcher: matcher.into(),
            hooks: commands.iter().map(|c| HookCommand::new(*c)).collect(),
        }
    }
}

/// Event delivered to a hook on stdin, tagged by `hook_event_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook_event_name")]
pub enum ToolCallEvent {
    SessionStart {
        #[serde(default)]
        session_id: String,
        #[serde(default)]
        source: String,
    },
    UserPromptSubmit {
        #[serde(default)]
        session_id: String,
        #[serde(default)]
        prompt: String,
    },
    PreToolUse {
        #[serde(default)]
        session_id: String,
        tool_name: String,
        #[serde(default)]
        tool_input: Value,
    },
    PostToolUse {
        #[serde(default)]
        session_id: String,
        tool_name: String,
        #[serde(default)]
        tool_input: Value,
        #[serde(default)]
        tool_response: Value,
    },
    PreCompact {
        #[serde(default)]
        session_id: String,
        #[serde(default)]
        trigger: String,
    },
}

impl ToolCallEvent {
    pub fn event_type(&self) -> HookEventType {
        match self {
            Self::SessionStart { .. } => HookEventType::SessionStart,
            Self::UserPromptSubmit { .. } => HookEventType::UserPromptSubmit,
            Self::PreToolUse { .. } => HookEventType::PreToolUse,
            Self::PostToolUse { .. } => HookEventType::PostToolUse,
            Self::PreCompact { .. } => HookEventType::PreCompact,
        }
    }

    /// Tool name for tool-scoped events, `""` otherwise.
    pub fn tool_name(&self) -> &str {
        match self {
            Self::PreToolUse { tool_name, .. } | Self::PostToolUse { tool_name, .. } => tool_name,
            _ => "",
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            Self::SessionStart { session_id, .. }
            | Self::UserPromptSubmit { session_id, .. }
            | Self::PreToolUse { session_id, .. }
            | Self::PostToolUse { session_id, .. }
            | Self::PreCompact { session_id, .. } => session_id,
        }
    }

    /// Copy of this event carrying a different session id.
    pub fn with_session_id(&self, id: impl Into<String>) -> Self {
        let mut event = self.clone();
        match &mut event {
            Self::SessionStart { session_id, .. }
            | Self::UserPromptSubmit { session_id, .. }
            | Self::PreToolUse { session_id, .. }
            | Self::PostToolUse { session_id, .. }
            | Self::PreCompact { session_id, .. } => *session_id = id.into(),
        }
        event
    }
}
