//! Configuration data model.
//!
//! Loader and source-resolution logic lives in `loader`/`sources` so parsing
//! and precedence behavior stays centralized.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_BIND, DEFAULT_HOOK_SHELL, DEFAULT_HOOK_TIMEOUT_MS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_HOOK_TIMEOUT_MS, DEFAULT_PREVIEW_ENV, DEFAULT_PROJECT_PATH,
    DEFAULT_SESSION_PREFIX, DEFAULT_TMUX_BINARY,
};
use super::sources::ConfigSource;

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sessions: SessionsConfig,
    pub hooks: HooksConfig,
    pub log: LogConfig,
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Terminal session registry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Namespace prefix marking dashboard-owned multiplexer sessions.
    pub prefix: String,
    /// Fallback working directory for new sessions (`~` is expanded).
    pub default_project_path: Option<String>,
    /// Override for the JAT projects registry (`~/.config/jat/projects.json`).
    pub projects_file: Option<String>,
    /// Multiplexer executable name or path.
    pub tmux_binary: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_SESSION_PREFIX.to_string(),
            default_project_path: Some(DEFAULT_PROJECT_PATH.to_string()),
            projects_file: None,
            tmux_binary: DEFAULT_TMUX_BINARY.to_string(),
        }
    }
}

/// Hook execution engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Shell used as `<shell> -c <command>`.
    pub shell: String,
    pub default_timeout_ms: u64,
    pub max_timeout_ms: u64,
    /// Name of the env var set to `true` for preview runs.
    pub preview_env: String,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_HOOK_SHELL.to_string(),
            default_timeout_ms: DEFAULT_HOOK_TIMEOUT_MS,
            max_timeout_ms: DEFAULT_MAX_HOOK_TIMEOUT_MS,
            preview_env: DEFAULT_PREVIEW_ENV.to_string(),
        }
    }
}

/// Logging preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl SessionsConfig {
    /// Configured default project path with `~` expanded.
    pub fn default_project_dir(&self) -> Option<PathBuf> {
        self.default_project_path
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(super::paths::expand_tilde)
    }

    /// Projects registry location: explicit override, else the JAT config dir.
    pub fn projects_file_path(&self) -> Option<PathBuf> {
        match self.projects_file.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(super::paths::expand_tilde(raw)),
            _ => super::paths::jat_config_dir()
                .map(|dir| dir.join(super::defaults::PROJECTS_FILE_NAME)),
        }
    }
}

/// Configuration payload plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}
