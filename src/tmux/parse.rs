//! Parsing of tmux list output and classification of tmux stderr.

use chrono::{DateTime, Utc};

use super::naming::SessionNamespace;
use super::Session;

/// `list-sessions` format: one `name:created:attached` tuple per line.
pub(crate) const LIST_FORMAT: &str = "#{session_name}:#{session_created}:#{session_attached}";

/// Parse `list-sessions` output, keeping only sessions inside `namespace`.
///
/// Lines that do not split into three fields are skipped.
pub(crate) fn parse_session_list(output: &str, namespace: &SessionNamespace) -> Vec<Session> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| parse_session_line(line, namespace))
        .collect()
}

fn parse_session_line(line: &str, namespace: &SessionNamespace) -> Option<Session> {
    // Split from the right: the numeric fields never contain `:`.
    let mut fields = line.rsplitn(3, ':');
    let attached = fields.next()?.trim();
    let created = fields.next()?.trim();
    let name = fields.next()?.trim();
    if !namespace.owns(name) {
        return None;
    }
    Some(Session {
        full_name: name.to_string(),
        display_name: namespace.display_name(name).to_string(),
        created_at: parse_epoch(created),
        attached: attached.parse::<u32>().map(|n| n > 0).unwrap_or(false),
    })
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// tmux has no server (never started, or socket removed on restart).
pub(crate) fn is_no_server(stderr: &str) -> bool {
    let text = stderr.to_ascii_lowercase();
    text.contains("no server running")
        || text.contains("error connecting to")
        || text.contains("failed to connect to server")
        || (text.contains("no such file or directory") && text.contains("tmux"))
}

/// The server is up but holds no sessions at all.
pub(crate) fn is_no_sessions(stderr: &str) -> bool {
    stderr.to_ascii_lowercase().contains("no sessions")
}

/// The named session does not exist.
pub(crate) fn is_session_missing(stderr: &str) -> bool {
    let text = stderr.to_ascii_lowercase();
    text.contains("can't find session")
        || text.contains("session not found")
        || is_no_server(stderr)
}

/// `new-session` lost a race against an identical name.
pub(crate) fn is_duplicate_session(stderr: &str) -> bool {
    stderr.to_ascii_lowercase().contains("duplicate session")
}
