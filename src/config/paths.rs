//! Config-path helpers shared by the loader and the session registry.

use std::path::{Path, PathBuf};

use super::defaults::{CONFIG_FILE_NAME, JAT_CONFIG_DIR};

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// Directory shared with the rest of the JAT tooling (`~/.config/jat`).
pub fn jat_config_dir() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(JAT_CONFIG_DIR))
}

/// Return the default per-user config path (`~/.config/jat/jat-dash.toml`).
pub fn default_global_config_path() -> Option<PathBuf> {
    jat_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` or `~/` against the current user's home directory.
pub fn expand_tilde(raw: &str) -> PathBuf {
    expand_tilde_with(raw, dirs::home_dir().as_deref())
}

pub(crate) fn expand_tilde_with(raw: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(raw);
    };
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}
