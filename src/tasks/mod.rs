/// Task implementations behind the CLI
///
/// Every task receives a `TaskContext`: the configuration loaded once at
/// startup and the runner used for external commands.
use crate::cmake::Generator;
use crate::config::TaskConfig;
use crate::exec::CommandRunner;

pub mod cmake;
pub mod cxx;

pub struct TaskContext<'a> {
    pub config: &'a TaskConfig,
    pub runner: &'a dyn CommandRunner,
}

impl<'a> TaskContext<'a> {
    pub fn new(config: &'a TaskConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Generator for an operation given the explicit and stored choices
    pub fn resolve_generator(
        &self,
        explicit: Option<&Generator>,
        stored: Option<&Generator>,
    ) -> Generator {
        Generator::resolve(explicit, stored, self.config.cmake.generator.as_deref())
    }
}
