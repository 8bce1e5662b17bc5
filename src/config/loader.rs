//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::apply_runtime_env_overrides;
use super::paths::config_root_dir;
use super::sources::read_config_text_with_sources;
use super::{Config, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_source(path_override)?.config)
}

/// Load configuration and report which source it came from.
pub fn load_config_with_source(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    validate(&mut config)?;
    Ok(LoadedConfig { config, source })
}

/// Reject values the registry or engine cannot operate with.
fn validate(config: &mut Config) -> Result<(), ConfigError> {
    let prefix = config.sessions.prefix.trim();
    if prefix.is_empty() {
        return Err(ConfigError::Invalid(
            "sessions.prefix must not be empty; it is the ownership boundary for kill".into(),
        ));
    }
    // tmux treats `:` and `.` as target separators.
    if prefix.contains([':', '.']) || prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!(
            "sessions.prefix `{prefix}` must not contain `:`, `.` or whitespace"
        )));
    }
    config.sessions.prefix = prefix.to_string();
    if config.hooks.shell.trim().is_empty() {
        return Err(ConfigError::Invalid("hooks.shell must not be empty".into()));
    }
    config.hooks.max_timeout_ms = config.hooks.max_timeout_ms.max(1);
    config.hooks.default_timeout_ms = config
        .hooks
        .default_timeout_ms
        .clamp(1, config.hooks.max_timeout_ms);
    Ok(())
}
