//! Dashboard session naming and the prefix ownership boundary.
//!
//! Every session this crate creates or kills lives under one namespace
//! prefix. The prefix doubles as the authorization check for `kill`, so all
//! callers go through [`SessionNamespace`] instead of string-concatenating.

use rand::Rng;

/// Alphabet for generated short identifiers.
const IDENTIFIER_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Length of generated short identifiers.
pub const GENERATED_IDENTIFIER_LEN: usize = 4;
/// tmux accepts longer names, but the UI truncates past this.
const MAX_IDENTIFIER_LEN: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionNamespace {
    prefix: String,
}

impl SessionNamespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when `full_name` is a dashboard-owned session name.
    ///
    /// The bare prefix is not a session of ours.
    pub fn owns(&self, full_name: &str) -> bool {
        full_name.len() > self.prefix.len() && full_name.starts_with(&self.prefix)
    }

    pub fn full_name(&self, identifier: &str) -> String {
        format!("{}{identifier}", self.prefix)
    }

    /// Strip the prefix for display; foreign names come back unchanged.
    pub fn display_name<'a>(&self, full_name: &'a str) -> &'a str {
        full_name.strip_prefix(&self.prefix).unwrap_or(full_name)
    }

    /// Turn an optional user hint into a session identifier.
    ///
    /// A hint that already carries the prefix is reduced to its identifier so
    /// callers may pass either form. Blank hints yield `None`.
    pub fn identifier_from_hint(&self, hint: Option<&str>) -> Option<String> {
        let raw = hint.map(str::trim).filter(|value| !value.is_empty())?;
        let raw = raw.strip_prefix(&self.prefix).unwrap_or(raw);
        sanitize_identifier(raw)
    }
}

/// Normalize a user-provided identifier into a tmux-safe fragment.
///
/// tmux treats `:` and `.` as target separators, so anything outside
/// `[A-Za-z0-9_-]` collapses to a single `-`.
pub(crate) fn sanitize_identifier(raw: &str) -> Option<String> {
    let mut out = String::new();
    let mut previous_dash = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            previous_dash = false;
            continue;
        }
        if matches!(ch, '-' | '_') {
            if !previous_dash && !out.is_empty() {
                out.push(ch);
                previous_dash = true;
            }
            continue;
        }
        if !previous_dash && !out.is_empty() {
            out.push('-');
            previous_dash = true;
        }
    }
    let trimmed: String = out
        .trim_matches(['-', '_'])
        .chars()
        .take(MAX_IDENTIFIER_LEN)
        .collect();
    let trimmed = trimmed.trim_end_matches(['-', '_']).to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Draw a short random identifier; collisions are possible but unlikely.
pub fn generate_identifier<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_IDENTIFIER_LEN)
        .map(|_| IDENTIFIER_ALPHABET[rng.gen_range(0..IDENTIFIER_ALPHABET.len())] as char)
        .collect()
}
