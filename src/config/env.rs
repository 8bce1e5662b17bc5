//! Environment overrides applied on top of the parsed config file.

use crate::error::ConfigError;

use super::Config;

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(bind) = non_empty(env_lookup, "JAT_DASH_BIND") {
        config.server.bind = bind;
    }
    if let Some(prefix) = non_empty(env_lookup, "JAT_DASH_SESSION_PREFIX") {
        config.sessions.prefix = prefix;
    }
    if let Some(binary) = non_empty(env_lookup, "JAT_DASH_TMUX") {
        config.sessions.tmux_binary = binary;
    }
    if let Some(timeout) = non_empty(env_lookup, "JAT_DASH_HOOK_TIMEOUT_MS") {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid JAT_DASH_HOOK_TIMEOUT_MS value `{timeout}`: expected positive integer milliseconds"
            ))
        })?;
        // Clamp to at least 1ms so a zero never means "no timeout".
        config.hooks.default_timeout_ms = parsed.max(1);
    }
    if let Some(level) = non_empty(env_lookup, "JAT_DASH_LOG") {
        config.log.level = level;
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
