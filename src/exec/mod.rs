/// Command execution abstraction for the external build tools
///
/// Every program cxtask shells out to goes through `CommandBuilder`, which
/// validates it against a whitelist, and a `CommandRunner`, which tasks take
/// as a parameter so tests can record invocations instead of running tools.
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

#[cfg(test)]
pub mod recording;

/// Programs cxtask is allowed to run
pub const ALLOWED_COMMANDS: &[&str] = &[
    "cmake",
    "ctest",
    "cppcheck",
    "cppcheck-htmlreport",
    "run-clang-tidy",
    "run-clang-tidy.py",
    "git",
];

/// Safe command builder with validation
#[derive(Clone, Debug)]
pub struct CommandBuilder {
    command: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env_vars: HashMap<String, String>,
}

/// Command execution result with metadata
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
    pub duration: Duration,
}

impl CommandBuilder {
    /// Create a new command builder for a binary
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            working_dir: None,
            env_vars: HashMap::new(),
        }
    }

    /// Add a command argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set working directory (applies to the child process only)
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for the child process
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.command
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Validate command name against the whitelist
    fn validate(&self) -> Result<()> {
        if !ALLOWED_COMMANDS.contains(&self.command.as_str()) {
            bail!(
                "Command '{}' not in whitelist. Allowed: {:?}",
                self.command,
                ALLOWED_COMMANDS
            );
        }
        Ok(())
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the command and capture its output
    pub fn execute(&self) -> Result<CommandResult> {
        self.validate()?;

        let start = Instant::now();
        let output = self
            .to_command()
            .output()
            .with_context(|| format!("Failed to execute command: {}", self.command))?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
            duration: start.elapsed(),
        })
    }

    /// Execute the command interactively (inherits stdin/stdout/stderr)
    ///
    /// Build tool diagnostics go straight to the terminal. A non-zero exit
    /// status is an error.
    pub fn execute_interactive(&self) -> Result<()> {
        self.validate()?;

        let status = self
            .to_command()
            .status()
            .with_context(|| format!("Failed to execute command: {}", self.command))?;

        if !status.success() {
            bail!(
                "Command '{}' failed with exit code: {}",
                self,
                status.code().unwrap_or(-1)
            );
        }

        Ok(())
    }
}

impl fmt::Display for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Convenience constructors for the tools cxtask drives
impl CommandBuilder {
    pub fn cmake() -> Self {
        Self::new("cmake")
    }

    pub fn ctest() -> Self {
        Self::new("ctest")
    }

    pub fn git(subcommand: &str) -> Self {
        Self::new("git").arg(subcommand)
    }
}

/// Runs external commands on behalf of tasks
pub trait CommandRunner {
    /// Run with inherited stdio; non-zero exit is an error
    fn run(&self, cmd: &CommandBuilder) -> Result<()>;

    /// Run and capture stdout/stderr
    fn capture(&self, cmd: &CommandBuilder) -> Result<CommandResult>;
}

/// Runner that spawns real processes, echoing each command first
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandBuilder) -> Result<()> {
        match cmd.get_working_dir() {
            Some(dir) => tracing::info!(cwd = %dir.display(), "{}", cmd),
            None => tracing::info!("{}", cmd),
        }
        cmd.execute_interactive()
    }

    fn capture(&self, cmd: &CommandBuilder) -> Result<CommandResult> {
        tracing::debug!("{}", cmd);
        let result = cmd.execute()?;
        tracing::debug!(
            exit_code = result.exit_code,
            elapsed_ms = result.duration.as_millis() as u64,
            "command finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_validation_allows_build_tools() {
        for program in ["cmake", "ctest", "cppcheck", "run-clang-tidy", "git"] {
            let cmd = CommandBuilder::new(program).arg("--version");
            assert!(cmd.validate().is_ok(), "'{}' should be whitelisted", program);
        }
    }

    #[test]
    fn test_command_validation_blocks_unlisted() {
        let cmd = CommandBuilder::new("rm").arg("-rf").arg("/");
        assert!(cmd.validate().is_err());
        assert!(cmd.execute().is_err());
    }

    #[test]
    fn test_shell_is_not_whitelisted() {
        let cmd = CommandBuilder::new("sh").arg("-c").arg("cmake ..");
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_display_quotes_spaced_args() {
        let cmd = CommandBuilder::cmake().arg("-G").arg("Unix Makefiles").arg("..");
        assert_eq!(cmd.to_string(), "cmake -G 'Unix Makefiles' ..");
    }

    #[test]
    fn test_builder_accessors() {
        let cmd = CommandBuilder::git("diff")
            .args(["--name-only", "src"])
            .working_dir("/tmp")
            .env("GIT_PAGER", "cat");

        assert_eq!(cmd.program(), "git");
        assert_eq!(cmd.get_args(), ["diff", "--name-only", "src"]);
        assert_eq!(cmd.get_working_dir(), Some(Path::new("/tmp")));
    }
}
