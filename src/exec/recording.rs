/// Test runner that records invocations instead of spawning processes
use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use super::{CommandBuilder, CommandResult, CommandRunner};

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// Names of the entries in the working dir at the time of the call
    pub dir_entries: Vec<String>,
}

impl Invocation {
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

type Hook = Box<dyn Fn(&CommandBuilder)>;

#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    failing: Vec<String>,
    stdout: HashMap<String, String>,
    hook: Option<Hook>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation of `program` exits non-zero
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.to_string());
        self
    }

    /// Captured stdout returned for `program`
    pub fn with_stdout(mut self, program: &str, stdout: &str) -> Self {
        self.stdout.insert(program.to_string(), stdout.to_string());
        self
    }

    /// Called for every successful invocation, e.g. to fake tool output files
    pub fn with_hook(mut self, hook: impl Fn(&CommandBuilder) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }

    /// `cmake` calls that configure (as opposed to `cmake --build`)
    pub fn configure_calls(&self) -> Vec<Invocation> {
        self.calls_to("cmake")
            .into_iter()
            .filter(|c| !c.has_arg("--build"))
            .collect()
    }

    fn record(&self, cmd: &CommandBuilder) -> Result<()> {
        let working_dir = cmd.get_working_dir().map(PathBuf::from);
        let mut dir_entries: Vec<String> = working_dir
            .as_ref()
            .and_then(|dir| fs::read_dir(dir).ok())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        dir_entries.sort();

        self.calls.borrow_mut().push(Invocation {
            program: cmd.program().to_string(),
            args: cmd.get_args().to_vec(),
            working_dir,
            dir_entries,
        });

        if self.failing.iter().any(|p| p == cmd.program()) {
            bail!("Command '{}' failed with exit code: 1", cmd);
        }

        if let Some(hook) = &self.hook {
            hook(cmd);
        }

        Ok(())
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &CommandBuilder) -> Result<()> {
        self.record(cmd)
    }

    fn capture(&self, cmd: &CommandBuilder) -> Result<CommandResult> {
        self.record(cmd)?;
        Ok(CommandResult {
            stdout: self.stdout.get(cmd.program()).cloned().unwrap_or_default(),
            stderr: String::new(),
            exit_code: 0,
            success: true,
            duration: Duration::ZERO,
        })
    }
}
