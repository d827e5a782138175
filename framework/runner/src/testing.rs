//! Test doubles for code that runs external commands.

use parking_lot::Mutex;

use crate::command::{CommandError, CommandExecutor, CommandLine, CommandStatus};

type Responder = Box<dyn Fn(&CommandLine) -> CommandStatus + Send + Sync>;

/// Records every command it is asked to run and answers with a configurable status instead of
/// starting a process.
pub struct RecordingCommandExecutor {
    calls: Mutex<Vec<CommandLine>>,
    responder: Responder,
}

impl Default for RecordingCommandExecutor {
    fn default() -> Self {
        Self::succeeding()
    }
}

impl RecordingCommandExecutor {
    /// Every command exits with code 0.
    pub fn succeeding() -> Self {
        Self::with_responder(|_| CommandStatus::from_code(0))
    }

    /// Every command exits with `code`.
    pub fn failing(code: i32) -> Self {
        Self::with_responder(move |_| CommandStatus::from_code(code))
    }

    pub fn with_responder(
        responder: impl Fn(&CommandLine) -> CommandStatus + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().clone()
    }

    /// Recorded commands as lossy argv vectors, program first.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .map(CommandLine::to_argv_lossy)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl CommandExecutor for RecordingCommandExecutor {
    fn execute(&self, command: &CommandLine) -> Result<CommandStatus, CommandError> {
        self.calls.lock().push(command.clone());
        Ok((self.responder)(command))
    }
}
