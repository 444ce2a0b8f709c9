pub mod marker;

pub use marker::{MarkerStore, MARKER_FILE_NAME};

use std::path::PathBuf;

use crate::cmake::{self, Decision, Generator};

/// Reconciliation-relevant state of a project's build directory
#[derive(Debug, Clone)]
pub struct BuildState {
    pub build_dir: PathBuf,
    pub stored_generator: Option<Generator>,
    pub exists: bool,
}

impl BuildState {
    /// Inspect a build directory on disk
    pub fn inspect(build_dir: impl Into<PathBuf>) -> Self {
        let build_dir = build_dir.into();
        let exists = build_dir.is_dir();
        let stored_generator = if exists {
            MarkerStore::load(&build_dir)
        } else {
            None
        };

        Self {
            build_dir,
            stored_generator,
            exists,
        }
    }

    /// Decision for configuring this build directory with `requested`
    pub fn decide(&self, requested: &Generator) -> Decision {
        cmake::decide(self.exists, self.stored_generator.as_ref(), requested)
    }
}
