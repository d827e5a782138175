//! Every external program the harness touches (the stress tools, `docker`, `cargo`) is started
//! through a [CommandExecutor], so the code that decides *what* to run can be tested without
//! running anything.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;

/// A program, its arguments and extra environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_envs(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    /// The program followed by its arguments, lossily converted for logging and assertions.
    pub fn to_argv_lossy(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_argv_lossy().join(" "))
    }
}

/// How a finished command exited. `code` is [None] when the process was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn signalled() -> Self {
        Self { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "termination by signal"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed with {status}")]
    NonZeroExit {
        command: String,
        status: CommandStatus,
    },
}

/// Runs a [CommandLine] to completion.
pub trait CommandExecutor: Send + Sync {
    /// Block until the command exits and report how it exited.
    fn execute(&self, command: &CommandLine) -> Result<CommandStatus, CommandError>;

    /// Like [CommandExecutor::execute] but any non-zero exit is an error.
    fn execute_checked(&self, command: &CommandLine) -> Result<(), CommandError> {
        let status = self.execute(command)?;
        if status.success() {
            Ok(())
        } else {
            Err(CommandError::NonZeroExit {
                command: command.to_string(),
                status,
            })
        }
    }
}

pub type SharedCommandExecutor = Arc<dyn CommandExecutor>;

/// Starts real child processes that inherit the harness's stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &CommandLine) -> Result<CommandStatus, CommandError> {
        log::debug!("Running `{command}`");
        let status = std::process::Command::new(command.program())
            .args(command.get_args())
            .envs(command.get_envs().iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;
        log::debug!("`{command}` finished with {status}");

        Ok(status.into())
    }
}
