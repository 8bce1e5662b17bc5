//! Unified error types for the orchestration core.

use std::fmt;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors surfaced by the terminal session registry.
///
/// "Already gone" conditions are never represented here; the registry folds
/// them into successful results before they reach a caller.
#[derive(Debug)]
pub enum SessionError {
    /// A required request parameter was missing or blank.
    MissingParameter(String),
    /// The target session is outside the dashboard-owned namespace.
    NotOwned(String),
    /// The multiplexer binary could not be spawned at all.
    Spawn(String),
    /// The multiplexer ran but reported an unexpected failure.
    Multiplexer(String),
}

impl SessionError {
    /// Short machine-readable category used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing_parameter",
            Self::NotOwned(_) => "not_owned",
            Self::Spawn(_) => "spawn_failed",
            Self::Multiplexer(_) => "multiplexer_error",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter(name) => write!(f, "missing required parameter: {name}"),
            Self::NotOwned(name) => {
                write!(f, "session `{name}` is not managed by this dashboard")
            }
            Self::Spawn(msg) => write!(f, "failed to run multiplexer: {msg}"),
            Self::Multiplexer(msg) => write!(f, "multiplexer error: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

// ---------------------------------------------------------------------------
// HookError
// ---------------------------------------------------------------------------

/// Errors from hook configuration parsing and request validation.
///
/// Hook *execution* failures are not errors: they are reported through
/// `ExecutionResult`.
#[derive(Debug)]
pub enum HookError {
    /// The hook command line was empty.
    EmptyCommand,
    /// No built-in scenario exists under this name.
    UnknownScenario(String),
    /// Unrecognized hook event type name.
    UnknownEventType(String),
    /// Settings or event JSON failed to parse.
    Json(serde_json::Error),
    /// Settings file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "hook command must not be empty"),
            Self::UnknownScenario(name) => write!(f, "unknown hook scenario `{name}`"),
            Self::UnknownEventType(name) => write!(f, "unknown hook event type `{name}`"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for HookError {}

impl From<serde_json::Error> for HookError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for HookError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_display() {
        assert_eq!(
            SessionError::MissingParameter("name".into()).to_string(),
            "missing required parameter: name"
        );
        assert_eq!(
            SessionError::NotOwned("main".into()).to_string(),
            "session `main` is not managed by this dashboard"
        );
    }

    #[test]
    fn session_error_kinds() {
        assert_eq!(SessionError::MissingParameter("x".into()).kind(), "missing_parameter");
        assert_eq!(SessionError::NotOwned("x".into()).kind(), "not_owned");
        assert_eq!(SessionError::Spawn("x".into()).kind(), "spawn_failed");
    }

    #[test]
    fn hook_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = HookError::from(json_err);
        assert!(e.to_string().starts_with("json:"), "got: {e}");
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let s = ConfigError::from(io_err).to_string();
        assert!(s.starts_with("io:"), "got: {s}");
        assert!(s.contains("file not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        assert!(ConfigError::from(toml_err).to_string().starts_with("toml:"));
    }

    #[test]
    fn config_error_invalid_message() {
        let e = ConfigError::Invalid("empty session prefix".into());
        assert_eq!(e.to_string(), "invalid config: empty session prefix");
    }
}
