pub mod cli;
pub mod cmake;
pub mod config;
pub mod exec;
pub mod fs;
pub mod log;
pub mod path;
pub mod projects;
pub mod state;
pub mod tasks;

// Re-export commonly used types
pub use cmake::{Decision, Generator};
pub use config::{Config, TaskConfig};
pub use projects::Project;
pub use state::{BuildState, MarkerStore};
