//! Reader for Claude-style `settings.json` hook sections.
//!
//! ```json
//! { "hooks": { "PreToolUse": [ { "matcher": "Bash", "hooks": [ { "type": "command", "command": "..." } ] } ] } }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::types::{HookEntry, HookEventType};
use crate::error::HookError;

/// Hook entries grouped by event type, entry order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSettings {
    pub hooks: BTreeMap<HookEventType, Vec<HookEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    hooks: BTreeMap<String, Vec<HookEntry>>,
}

impl HookSettings {
    pub fn entries_for(&self, event_type: HookEventType) -> &[HookEntry] {
        self.hooks
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(Vec::is_empty)
    }
}

/// Parse settings JSON. Unknown event types are skipped with a warning.
pub fn parse_settings(raw: &str) -> Result<HookSettings, HookError> {
    let parsed: RawSettings = serde_json::from_str(raw)?;
    let mut hooks = BTreeMap::new();
    for (name, entries) in parsed.hooks {
        match name.parse::<HookEventType>() {
            Ok(event_type) => {
                hooks
                    .entry(event_type)
                    .or_insert_with(Vec::new)
                    .extend(entries);
            }
            Err(_) => {
                tracing::warn!(event_type = %name, "skipping hooks for unknown event type");
            }
        }
    }
    Ok(HookSettings { hooks })
}

pub fn load_settings(path: &Path) -> Result<HookSettings, HookError> {
    let text = std::fs::read_to_string(path)?;
    parse_settings(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    const SAMPLE: &str = r#"{
        "permissions": {"allow": []},
        "hooks": {
            "PreToolUse": [
                {"matcher": "Bash", "hooks": [{"type": "command", "command": "check-bash", "timeout": 30}]},
                {"matcher": "Edit|Write", "hooks": [{"type": "command", "command": "check-edit"}]}
            ],
            "SessionStart": [
                {"hooks": [{"type": "command", "command": "greet"}]}
            ],
            "Notification": [
                {"hooks": [{"type": "command", "command": "notify"}]}
            ]
        }
    }"#;

    #[test]
    fn groups_entries_by_event_type_in_order() {
        let settings = parse_settings(SAMPLE).unwrap();
        let pre = settings.entries_for(HookEventType::PreToolUse);
        assert_eq!(pre.len(), 2);
        assert_eq!(pre[0].matcher, "Bash");
        assert_eq!(pre[0].hooks[0].timeout, Some(30));
        assert_eq!(pre[1].hooks[0].command, "check-edit");
    }

    #[test]
    fn missing_matcher_defaults_to_match_all() {
        let settings = parse_settings(SAMPLE).unwrap();
        assert_eq!(settings.entries_for(HookEventType::SessionStart)[0].matcher, ".*");
    }

    #[test]
    fn unknown_event_types_are_skipped() {
        let settings = parse_settings(SAMPLE).unwrap();
        assert_eq!(settings.hooks.len(), 2);
        assert!(settings.entries_for(HookEventType::PreCompact).is_empty());
    }

    #[test]
    fn settings_without_hooks_are_empty() {
        assert!(parse_settings(r#"{"model": "x"}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_settings("{"), Err(HookError::Json(_))));
    }

    #[test]
    fn loads_from_disk() {
        let tmp = TestTempDir::new("settings");
        let path = tmp.write_text(".claude/settings.json", SAMPLE);
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.entries_for(HookEventType::PreToolUse).len(), 2);
        assert!(matches!(
            load_settings(&tmp.child("missing.json")),
            Err(HookError::Io(_))
        ));
    }
}
