use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cmake::Generator;

/// Marker file recording the generator of the last successful configure
pub const MARKER_FILE_NAME: &str = ".cmake_generator";

/// Load/store access to `<build_dir>/.cmake_generator`
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerStore;

impl MarkerStore {
    pub fn marker_path(build_dir: &Path) -> PathBuf {
        build_dir.join(MARKER_FILE_NAME)
    }

    /// Generator stored for a build directory.
    ///
    /// A missing, unreadable or empty marker all mean "unset".
    pub fn load(build_dir: &Path) -> Option<Generator> {
        let content = fs::read_to_string(Self::marker_path(build_dir)).ok()?;
        let name = content.trim();
        if name.is_empty() {
            return None;
        }
        Some(Generator::new(name))
    }

    /// Record the generator used for a build directory.
    ///
    /// Creates the build directory if needed and overwrites any previous value.
    /// Call only after the configure step succeeded.
    pub fn store(build_dir: &Path, generator: &Generator) -> Result<()> {
        crate::fs::write_file_atomic(
            &Self::marker_path(build_dir),
            generator.as_str().as_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_marker() {
        let temp = TempDir::new().unwrap();
        assert!(MarkerStore::load(&temp.path().join("build")).is_none());
    }

    #[test]
    fn test_load_empty_marker() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MARKER_FILE_NAME), "  \n").unwrap();
        assert!(MarkerStore::load(temp.path()).is_none());
    }

    #[test]
    fn test_load_trims_and_canonicalizes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MARKER_FILE_NAME), "Ninja\n").unwrap();
        assert_eq!(MarkerStore::load(temp.path()), Some(Generator::new("ninja")));
    }

    #[test]
    fn test_store_creates_build_dir() {
        let temp = TempDir::new().unwrap();
        let build_dir = temp.path().join("demo/build");

        MarkerStore::store(&build_dir, &Generator::new("ninja")).unwrap();

        let content = fs::read_to_string(build_dir.join(MARKER_FILE_NAME)).unwrap();
        assert_eq!(content, "ninja");
    }

    #[test]
    fn test_store_overwrites() {
        let temp = TempDir::new().unwrap();

        MarkerStore::store(temp.path(), &Generator::new("make")).unwrap();
        MarkerStore::store(temp.path(), &Generator::new("Ninja")).unwrap();

        assert_eq!(MarkerStore::load(temp.path()), Some(Generator::new("ninja")));
    }
}
