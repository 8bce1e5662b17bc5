//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`JAT_DASH_BIND`, `JAT_DASH_SESSION_PREFIX`,
//!    `JAT_DASH_TMUX`, `JAT_DASH_HOOK_TIMEOUT_MS`, `JAT_DASH_LOG`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./jat-dash.toml in the current directory
//! 4. $XDG_CONFIG_HOME/jat/jat-dash.toml (or ~/.config/jat/jat-dash.toml)
//! 5. Built-in defaults

pub(crate) mod defaults;
mod env;
mod loader;
mod paths;
mod projects;
mod sources;
mod types;

pub use loader::{load_config, load_config_with_source};
pub use paths::{config_root_dir, default_global_config_path, expand_tilde, jat_config_dir};
pub use projects::{load_projects_file, parse_projects, ProjectEntry};
pub use sources::ConfigSource;
pub use types::{Config, HooksConfig, LoadedConfig, LogConfig, ServerConfig, SessionsConfig};
