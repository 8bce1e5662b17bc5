//! Matcher evaluation over ordered hook entries.
//!
//! Patterns come from user-editable settings, so a bad one is reported on its
//! own result and never stops the remaining entries from being evaluated.

use regex::RegexBuilder;
use serde::Serialize;

use super::types::{HookCommand, HookEntry, ToolCallEvent};

/// Compiled program size cap for user-supplied patterns.
const MATCHER_SIZE_LIMIT: usize = 1 << 20;

/// Outcome of one entry's matcher against one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub entry: HookEntry,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Match every entry against the event's tool name, preserving entry order.
pub fn match_entries(entries: &[HookEntry], event: &ToolCallEvent) -> Vec<MatchResult> {
    match_tool_name(entries, event.tool_name())
}

/// Match every entry against a bare tool name (`""` for non-tool events).
pub fn match_tool_name(entries: &[HookEntry], tool_name: &str) -> Vec<MatchResult> {
    entries
        .iter()
        .map(|entry| match_one(entry, tool_name))
        .collect()
}

fn match_one(entry: &HookEntry, tool_name: &str) -> MatchResult {
    let regex = match RegexBuilder::new(&entry.matcher)
        .size_limit(MATCHER_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!(matcher = %entry.matcher, "invalid matcher: {e}");
            return MatchResult {
                entry: entry.clone(),
                matched: false,
                matched_text: None,
                error: Some(e.to_string()),
            };
        }
    };
    let found = regex.find(tool_name);
    MatchResult {
        entry: entry.clone(),
        matched: found.is_some(),
        matched_text: found.map(|m| m.as_str().to_string()),
        error: None,
    }
}

/// First hook of the first matched entry.
pub fn primary_command(results: &[MatchResult]) -> Option<&HookCommand> {
    matched_commands(results).next()
}

/// All hooks of all matched entries, in run order.
pub fn matched_commands(results: &[MatchResult]) -> impl Iterator<Item = &HookCommand> {
    results
        .iter()
        .filter(|result| result.matched)
        .flat_map(|result| result.entry.hooks.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pre_tool(tool: &str) -> ToolCallEvent {
        ToolCallEvent::PreToolUse {
            session_id: String::new(),
            tool_name: tool.into(),
            tool_input: json!({}),
        }
    }

    #[test]
    fn anchored_matcher_is_exact() {
        let entries = vec![HookEntry::new("^Bash$", &["echo bash"])];

        let hit = match_entries(&entries, &pre_tool("Bash"));
        assert!(hit[0].matched);
        assert_eq!(hit[0].matched_text.as_deref(), Some("Bash"));

        let miss = match_entries(&entries, &pre_tool("BashTool"));
        assert!(!miss[0].matched);
        assert_eq!(miss[0].matched_text, None);
        assert_eq!(miss[0].error, None);
    }

    #[test]
    fn malformed_matcher_only_fails_its_own_entry() {
        let entries = vec![
            HookEntry::new("Edit|Write", &["a"]),
            HookEntry::new("(unclosed", &["b"]),
            HookEntry::new("Wri", &["c"]),
        ];
        let results = match_entries(&entries, &pre_tool("Write"));
        assert_eq!(results.len(), 3);
        assert!(results[0].matched);
        assert!(!results[1].matched);
        assert!(results[1].error.is_some());
        assert!(results[2].matched);
        assert_eq!(results[2].matched_text.as_deref(), Some("Wri"));
    }

    #[test]
    fn match_all_hits_non_tool_events() {
        let entries = vec![HookEntry::new(".*", &["echo start"])];
        let event = ToolCallEvent::SessionStart {
            session_id: String::new(),
            source: "startup".into(),
        };
        let results = match_entries(&entries, &event);
        assert!(results[0].matched);
        assert_eq!(results[0].matched_text.as_deref(), Some(""));
    }

    #[test]
    fn primary_command_skips_unmatched_entries() {
        let entries = vec![
            HookEntry::new("^Read$", &["read-hook"]),
            HookEntry::new("Bash", &["first", "second"]),
            HookEntry::new(".*", &["catch-all"]),
        ];
        let results = match_entries(&entries, &pre_tool("Bash"));
        assert_eq!(primary_command(&results).map(|c| c.command.as_str()), Some("first"));
        let all: Vec<&str> = matched_commands(&results)
            .map(|c| c.command.as_str())
            .collect();
        assert_eq!(all, vec!["first", "second", "catch-all"]);
    }

    #[test]
    fn no_entries_means_no_primary() {
        assert!(primary_command(&match_entries(&[], &pre_tool("Bash"))).is_none());
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let results = match_tool_name(&[HookEntry::new("Ba", &["x"])], "Bash");
        let value = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(value["matchedText"], "Ba");
        assert!(value.get("error").is_none());
    }

    #[cfg(feature = "fuzz-tests")]
    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn one_result_per_entry_for_arbitrary_patterns(
                patterns in proptest::collection::vec(".{0,12}", 0..8),
                tool in "[A-Za-z]{0,10}",
            ) {
                let entries: Vec<HookEntry> = patterns
                    .iter()
                    .map(|p| HookEntry::new(p.as_str(), &["true"]))
                    .collect();
                let results = match_tool_name(&entries, &tool);
                prop_assert_eq!(results.len(), entries.len());
                for (result, entry) in results.iter().zip(&entries) {
                    prop_assert_eq!(&result.entry, entry);
                    prop_assert!(!(result.matched && result.error.is_some()));
                }
            }
        }
    }
}
