//! Default configuration constants.
//!
//! Callers share these constants instead of duplicating literals.

/// Address the HTTP API binds to when nothing else is configured.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:3333";
/// Namespace prefix for every dashboard-owned multiplexer session.
pub(crate) const DEFAULT_SESSION_PREFIX: &str = "jat-term-";
/// Project directory new sessions start in when the caller gives no path.
pub(crate) const DEFAULT_PROJECT_PATH: &str = "~/code/jat";
/// Multiplexer executable.
pub(crate) const DEFAULT_TMUX_BINARY: &str = "tmux";
/// Shell used to interpret hook command lines.
pub(crate) const DEFAULT_HOOK_SHELL: &str = "sh";
/// Hook timeout applied when a request does not carry one.
pub(crate) const DEFAULT_HOOK_TIMEOUT_MS: u64 = 10_000;
/// Upper bound for any requested hook timeout.
pub(crate) const DEFAULT_MAX_HOOK_TIMEOUT_MS: u64 = 60_000;
/// Environment flag telling hook scripts they run in preview mode.
pub(crate) const DEFAULT_PREVIEW_ENV: &str = "HOOK_PREVIEW";
/// Default tracing filter directive.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";
/// Subdirectory of the config root shared with the rest of the JAT tooling.
pub(crate) const JAT_CONFIG_DIR: &str = "jat";
/// Config file name, both locally and under the JAT config dir.
pub(crate) const CONFIG_FILE_NAME: &str = "jat-dash.toml";
/// Projects registry maintained by the JAT project editor.
pub(crate) const PROJECTS_FILE_NAME: &str = "projects.json";
