use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default build subdirectory inside every CMake project
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Task runner configuration (cxtask.toml)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TaskConfig {
    pub cmake: CmakeConfig,
    pub cppcheck: CppcheckConfig,
    pub clang_tidy: ClangTidyConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CmakeConfig {
    /// Global default generator (short alias or full CMake name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    pub build_dir: String,
    pub project_dirs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CppcheckConfig {
    pub profile: String,
    pub report_dir: String,
    pub profiles: BTreeMap<String, CppcheckProfile>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CppcheckProfile {
    pub options: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ClangTidyConfig {
    pub program: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Build directory holding compile_commands.json
    pub build_dir: String,
    /// CMake source tree configured into `build_dir` (relative to the cwd)
    pub source_dir: String,
}

impl Default for CmakeConfig {
    fn default() -> Self {
        Self {
            generator: None,
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            project_dirs: vec![],
        }
    }
}

impl Default for CppcheckConfig {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), CppcheckProfile::default());

        Self {
            profile: "default".to_string(),
            report_dir: "build/cppcheck".to_string(),
            profiles,
        }
    }
}

impl Default for ClangTidyConfig {
    fn default() -> Self {
        Self {
            program: "run-clang-tidy".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            source_dir: ".".to_string(),
        }
    }
}

impl CppcheckConfig {
    /// Options of the selected profile (empty if the profile is unknown)
    pub fn active_options(&self) -> &[String] {
        self.profiles
            .get(&self.profile)
            .map(|p| p.options.as_slice())
            .unwrap_or(&[])
    }
}
