//! Working-directory fallback chain for new sessions.
//!
//! Order: caller path, configured default project, first project from the
//! JAT projects registry, home directory. Each step is only evaluated when
//! every earlier one came up empty, so the registry is not even read when the
//! caller's path exists.

use std::path::{Path, PathBuf};

use crate::config::{expand_tilde, load_projects_file, ProjectEntry, SessionsConfig};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct WorkingDirResolver {
    default_project: Option<PathBuf>,
    projects_file: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl WorkingDirResolver {
    pub fn new(
        default_project: Option<PathBuf>,
        projects_file: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Self {
        Self {
            default_project,
            projects_file,
            home,
        }
    }

    pub fn from_config(config: &SessionsConfig) -> Self {
        Self::new(
            config.default_project_dir(),
            config.projects_file_path(),
            dirs::home_dir(),
        )
    }

    /// Resolve the directory a new session should start in.
    ///
    /// Directory probes and the registry read run on the blocking pool.
    pub async fn resolve(&self, requested: Option<&str>) -> Option<PathBuf> {
        let resolver = self.clone();
        let requested = requested.map(str::to_owned);
        let lookup = tokio::task::spawn_blocking(move || {
            resolver.resolve_with(requested.as_deref(), |path| path.is_dir(), load_projects_file)
        });
        match lookup.await {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("working dir lookup aborted: {e}");
                self.home.clone()
            }
        }
    }

    pub(crate) fn resolve_with<FExists, FProjects>(
        &self,
        requested: Option<&str>,
        exists: FExists,
        load_projects: FProjects,
    ) -> Option<PathBuf>
    where
        FExists: Fn(&Path) -> bool,
        FProjects: FnOnce(&Path) -> Result<Vec<ProjectEntry>, ConfigError>,
    {
        if let Some(raw) = requested.map(str::trim).filter(|raw| !raw.is_empty()) {
            let path = expand_tilde(raw);
            if exists(&path) {
                return Some(path);
            }
            tracing::debug!(path = %path.display(), "requested working dir missing; falling back");
        }

        if let Some(path) = self.default_project.as_deref() {
            if exists(path) {
                return Some(path.to_path_buf());
            }
        }

        if let Some(file) = self.projects_file.as_deref() {
            match load_projects(file) {
                Ok(projects) => {
                    if let Some(project) = projects.into_iter().find(|p| exists(&p.path)) {
                        return Some(project.path);
                    }
                }
                Err(e) => {
                    tracing::warn!(file = %file.display(), "ignoring unreadable projects registry: {e}");
                }
            }
        }

        self.home.clone()
    }
}
