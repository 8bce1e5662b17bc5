//! Version and build stamp shared by `--version`, the serve log line, and
//! `GET /health`.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// `git describe` output at build time, or `unknown`.
pub const GIT_COMMIT: &str = env!("JAT_DASH_BUILD_GIT_HASH");
/// RFC 3339 UTC build time.
pub const BUILD_TIMESTAMP: &str = env!("JAT_DASH_BUILD_TIMESTAMP");

/// `--help` trailer.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build: ",
    env!("JAT_DASH_BUILD_GIT_HASH"),
    " (",
    env!("JAT_DASH_BUILD_TIMESTAMP"),
    ")"
);

/// Build stamp as reported over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub built: &'static str,
}

pub const CURRENT: BuildInfo = BuildInfo {
    version: VERSION,
    commit: GIT_COMMIT,
    built: BUILD_TIMESTAMP,
};

pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

pub fn cli_version_text() -> String {
    format!("jat-dash {VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}
