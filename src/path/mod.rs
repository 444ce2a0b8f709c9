/// Project path handling with validation and expansion
///
/// Project directories come from cxtask.toml or the command line, so they get:
/// - Tilde expansion (~/ → /home/name/)
/// - Rejection of UNC paths and remote URLs
/// - Validation of the build subdirectory name
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A project directory as given by the user, plus its expanded form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath {
    /// Original user input (e.g., "~/src/demo")
    original: String,

    /// Expanded path with tilde replaced (e.g., "/home/name/src/demo")
    expanded: PathBuf,
}

impl ProjectPath {
    /// Create a ProjectPath from user input
    ///
    /// # Examples
    /// ```
    /// use cxtask::path::ProjectPath;
    ///
    /// let path = ProjectPath::from_user_input("~/demo").unwrap();
    /// assert!(!path.expanded().to_str().unwrap().contains('~'));
    /// ```
    pub fn from_user_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Project path cannot be empty");
        }

        Self::reject_remote_paths(trimmed)?;

        let expanded = PathBuf::from(shellexpand::tilde(trimmed).to_string());

        Ok(Self {
            original: trimmed.to_string(),
            expanded,
        })
    }

    /// Detect remote/network paths; CMake has to run locally
    fn reject_remote_paths(input: &str) -> Result<()> {
        if input.starts_with("\\\\") {
            anyhow::bail!("Network UNC paths are not supported: {}", input);
        }

        if ["ssh://", "sftp://", "smb://", "nfs://"]
            .iter()
            .any(|scheme| input.starts_with(scheme))
        {
            anyhow::bail!("Remote URL paths are not supported: {}", input);
        }

        Ok(())
    }

    /// Get the expanded path (tilde replaced)
    pub fn expanded(&self) -> &Path {
        &self.expanded
    }

    /// Get the original user input (used in log fields)
    pub fn original(&self) -> &str {
        &self.original
    }
}

/// Reject build subdirectory names that would escape the project directory
pub fn validate_build_subdir(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Build directory name cannot be empty");
    }

    if name.contains('/') || name.contains('\\') {
        anyhow::bail!(
            "Build directory name cannot contain separators: '{}'",
            name
        );
    }

    if name == ".." || name == "." {
        anyhow::bail!("Build directory name cannot be '.' or '..': '{}'", name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilde_expansion() {
        let path = ProjectPath::from_user_input("~/demo").unwrap();
        assert!(!path.expanded().to_str().unwrap().contains('~'));
        assert_eq!(path.original(), "~/demo");
    }

    #[test]
    fn test_relative_path_kept_relative() {
        let path = ProjectPath::from_user_input("01_Program_example1").unwrap();
        assert_eq!(path.expanded(), Path::new("01_Program_example1"));
    }

    #[test]
    fn test_empty_path() {
        assert!(ProjectPath::from_user_input("").is_err());
        assert!(ProjectPath::from_user_input("   ").is_err());
    }

    #[test]
    fn test_remote_path_detection() {
        assert!(ProjectPath::from_user_input("\\\\server\\share").is_err());

        assert!(ProjectPath::from_user_input("ssh://user@host/path").is_err());
        assert!(ProjectPath::from_user_input("smb://server/share").is_err());
    }

    #[test]
    fn test_local_names_with_at_and_colon() {
        let path = ProjectPath::from_user_input("a@b:c").unwrap();
        assert_eq!(path.expanded(), Path::new("a@b:c"));

        assert!(ProjectPath::from_user_input("libs/fmt@10:debug").is_ok());
    }

    #[test]
    fn test_build_subdir_validation() {
        assert!(validate_build_subdir("build").is_ok());
        assert!(validate_build_subdir("build.Linux_x86_64_debug").is_ok());
        assert!(validate_build_subdir("../build").is_err());
        assert!(validate_build_subdir("out/build").is_err());
        assert!(validate_build_subdir("..").is_err());
        assert!(validate_build_subdir(".").is_err());
        assert!(validate_build_subdir("").is_err());
    }
}
