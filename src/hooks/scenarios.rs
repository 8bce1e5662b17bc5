//! Built-in sample events for trying hooks from the dashboard.

use serde::Serialize;
use serde_json::json;

use super::types::{HookEventType, ToolCallEvent};
use crate::error::HookError;

/// A named sample event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub event_type: HookEventType,
    pub event: ToolCallEvent,
}

fn scenario(name: &'static str, description: &'static str, event: ToolCallEvent) -> Scenario {
    Scenario {
        name,
        description,
        event_type: event.event_type(),
        event,
    }
}

/// Every built-in scenario, grouped by event type in lifecycle order.
pub fn catalog() -> Vec<Scenario> {
    vec![
        scenario(
            "session-start",
            "Agent session starting up",
            ToolCallEvent::SessionStart {
                session_id: String::new(),
                source: "startup".into(),
            },
        ),
        scenario(
            "prompt-submit",
            "User submits a prompt",
            ToolCallEvent::UserPromptSubmit {
                session_id: String::new(),
                prompt: "Summarize the open tasks in this project".into(),
            },
        ),
        scenario(
            "bash-pre",
            "Before running a shell command",
            ToolCallEvent::PreToolUse {
                session_id: String::new(),
                tool_name: "Bash".into(),
                tool_input: json!({
                    "command": "ls -la",
                    "description": "List files in current directory"
                }),
            },
        ),
        scenario(
            "edit-pre",
            "Before editing a file",
            ToolCallEvent::PreToolUse {
                session_id: String::new(),
                tool_name: "Edit".into(),
                tool_input: json!({
                    "file_path": "/tmp/example.txt",
                    "old_string": "hello",
                    "new_string": "goodbye"
                }),
            },
        ),
        scenario(
            "write-post",
            "After writing a file",
            ToolCallEvent::PostToolUse {
                session_id: String::new(),
                tool_name: "Write".into(),
                tool_input: json!({
                    "file_path": "/tmp/example.txt",
                    "content": "hello world\n"
                }),
                tool_response: json!({
                    "filePath": "/tmp/example.txt",
                    "success": true
                }),
            },
        ),
        scenario(
            "pre-compact",
            "Before the conversation is compacted",
            ToolCallEvent::PreCompact {
                session_id: String::new(),
                trigger: "manual".into(),
            },
        ),
    ]
}

/// Look up a scenario by name.
pub fn find(name: &str) -> Result<Scenario, HookError> {
    let name = name.trim();
    catalog()
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| HookError::UnknownScenario(name.to_string()))
}

/// First scenario for an event type.
pub fn default_for(event_type: HookEventType) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.event_type == event_type)
}
