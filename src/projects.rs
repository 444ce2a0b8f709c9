use anyhow::Result;
use std::path::PathBuf;

use crate::config::CmakeConfig;
use crate::path::ProjectPath;

/// Scope token meaning "every configured project"
pub const ALL_PROJECTS: &str = "all";

/// A CMake project directory and the name of its build subdirectory
#[derive(Debug, Clone)]
pub struct Project {
    pub path: ProjectPath,
    pub build_subdir: String,
}

impl Project {
    pub fn new(dir: &str, build_subdir: &str) -> Result<Self> {
        let path = ProjectPath::from_user_input(dir)?;
        crate::path::validate_build_subdir(build_subdir)?;

        Ok(Self {
            path,
            build_subdir: build_subdir.to_string(),
        })
    }

    /// `<project_dir>/<build_subdir>`
    pub fn build_dir(&self) -> PathBuf {
        self.path.expanded().join(&self.build_subdir)
    }
}

/// Expand a project scope into project directories.
///
/// `"all"` (or no scope) yields the configured list in order, without
/// deduplication; anything else names exactly one directory.
pub fn select_project_dirs<'a>(scope: Option<&'a str>, configured: &'a [String]) -> Vec<&'a str> {
    match scope {
        Some(project) if project != ALL_PROJECTS => vec![project],
        _ => configured.iter().map(String::as_str).collect(),
    }
}

/// Resolve a project scope against the cmake configuration
pub fn select_projects(scope: Option<&str>, config: &CmakeConfig) -> Result<Vec<Project>> {
    let dirs = select_project_dirs(scope, &config.project_dirs);
    tracing::debug!(scope = scope.unwrap_or(ALL_PROJECTS), count = dirs.len(), "selected projects");

    let projects = dirs
        .into_iter()
        .map(|dir| Project::new(dir, &config.build_dir))
        .collect::<Result<Vec<_>>>()?;

    for project in &projects {
        tracing::debug!(
            project = project.path.original(),
            build_dir = %project.build_dir().display(),
            "project"
        );
    }

    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn configured() -> Vec<String> {
        vec![
            "01_Program_example1".to_string(),
            "CTEST_example1".to_string(),
            "01_Program_example1".to_string(),
        ]
    }

    #[test]
    fn test_all_keeps_order_and_duplicates() {
        let dirs = configured();
        assert_eq!(
            select_project_dirs(Some("all"), &dirs),
            ["01_Program_example1", "CTEST_example1", "01_Program_example1"]
        );
    }

    #[test]
    fn test_no_scope_means_all() {
        let dirs = configured();
        assert_eq!(select_project_dirs(None, &dirs).len(), 3);
    }

    #[test]
    fn test_single_project() {
        let dirs = configured();
        assert_eq!(select_project_dirs(Some("demo"), &dirs), ["demo"]);
    }

    #[test]
    fn test_all_with_empty_config_is_empty() {
        assert!(select_project_dirs(Some("all"), &[]).is_empty());
        assert!(select_projects(None, &CmakeConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_select_projects_uses_build_subdir() {
        let config = CmakeConfig {
            build_dir: "out".to_string(),
            ..CmakeConfig::default()
        };

        let projects = select_projects(Some("demo"), &config).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].build_dir(), Path::new("demo/out"));
    }

    #[test]
    fn test_select_projects_keeps_user_input() {
        let projects = select_projects(Some(" ~/demo "), &CmakeConfig::default()).unwrap();
        assert_eq!(projects[0].path.original(), "~/demo");
        assert!(projects[0].build_dir().ends_with("demo/build"));
    }

    #[test]
    fn test_invalid_build_subdir_is_rejected() {
        assert!(Project::new("demo", "../elsewhere").is_err());
    }
}
