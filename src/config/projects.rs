//! Reader for the JAT projects registry (`~/.config/jat/projects.json`).
//!
//! The registry is owned by the project editor; this module only reads it to
//! find a usable working directory for new terminal sessions. Both the keyed
//! form (`{"projects": {"name": {"path": ..}}}`) and the list form
//! (`{"projects": [{"name": .., "path": ..}]}`) are accepted.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// One project with its `~`-expanded path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectsFile {
    Wrapped { projects: ProjectList },
    Bare(ProjectList),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectList {
    Keyed(BTreeMap<String, RawProject>),
    Listed(Vec<RawProject>),
}

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

/// Parse registry JSON into projects, skipping entries without a path.
///
/// Keyed registries come back in key order.
pub fn parse_projects(raw: &str) -> Result<Vec<ProjectEntry>, ConfigError> {
    let parsed: ProjectsFile = serde_json::from_str(raw)?;
    let list = match parsed {
        ProjectsFile::Wrapped { projects } | ProjectsFile::Bare(projects) => projects,
    };
    let pairs: Vec<(String, RawProject)> = match list {
        ProjectList::Keyed(map) => map.into_iter().collect(),
        ProjectList::Listed(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| (format!("project-{idx}"), item))
            .collect(),
    };
    Ok(pairs
        .into_iter()
        .filter_map(|(key, raw)| {
            let path = raw.path.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
            Some(ProjectEntry {
                name: raw.name.unwrap_or(key),
                path: super::paths::expand_tilde(path),
            })
        })
        .collect())
}

/// Read and parse the registry. A missing file is an empty registry.
pub fn load_projects_file(path: &Path) -> Result<Vec<ProjectEntry>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_projects(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(ConfigError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyed_registry() {
        let raw = r#"{"projects": {"other": {"path": "/srv/other"}, "alpha": {"path": "/srv/alpha", "name": "Alpha"}}}"#;
        let projects = parse_projects(raw).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Alpha");
        assert_eq!(projects[0].path, PathBuf::from("/srv/alpha"));
        assert_eq!(projects[1].name, "other");
    }

    #[test]
    fn parses_listed_registry_and_skips_pathless_entries() {
        let raw = r#"{"projects": [{"name": "a"}, {"name": "b", "path": "/srv/b"}]}"#;
        let projects = parse_projects(raw).unwrap();
        assert_eq!(
            projects,
            vec![ProjectEntry {
                name: "b".into(),
                path: PathBuf::from("/srv/b"),
            }]
        );
    }

    #[test]
    fn parses_bare_list() {
        let projects = parse_projects(r#"[{"path": "/srv/x"}]"#).unwrap();
        assert_eq!(projects[0].name, "project-0");
    }

    #[test]
    fn expands_home_in_paths() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let projects = parse_projects(r#"{"projects": {"o": {"path": "~/code/other"}}}"#).unwrap();
        assert_eq!(projects[0].path, home.join("code/other"));
    }

    #[test]
    fn missing_file_is_empty_registry() {
        let projects = load_projects_file(Path::new("/definitely/not/here/projects.json")).unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn malformed_registry_is_an_error() {
        assert!(matches!(parse_projects("{"), Err(ConfigError::Json(_))));
    }
}
