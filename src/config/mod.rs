pub mod types;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{
    AnalysisConfig, ClangTidyConfig, CmakeConfig, CppcheckConfig, CppcheckProfile, TaskConfig,
    DEFAULT_BUILD_DIR,
};

/// Project-local config file name
pub const CONFIG_FILE_NAME: &str = "cxtask.toml";

/// Loaded configuration plus the file it came from (None = built-in defaults)
pub struct Config {
    pub tasks: TaskConfig,
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration once at startup.
    ///
    /// An explicit path must exist. Otherwise `./cxtask.toml` is tried, then
    /// `~/.config/cxtask/config.toml`, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let tasks = Self::load_from(path)?;
            return Ok(Self {
                tasks,
                source: Some(path.to_path_buf()),
            });
        }

        let config_paths: Vec<Option<PathBuf>> = vec![
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::home_dir().map(|p| p.join(".config/cxtask/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                let tasks = Self::load_from(&path)?;
                return Ok(Self {
                    tasks,
                    source: Some(path),
                });
            }
        }

        Ok(Self::default())
    }

    /// Parse a TOML config file
    pub fn load_from(path: &Path) -> Result<TaskConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
    }

    fn parse(content: &str) -> Result<TaskConfig> {
        let config: TaskConfig = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks: TaskConfig::default(),
            source: None,
        }
    }
}
