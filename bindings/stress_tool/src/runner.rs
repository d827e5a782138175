use std::path::PathBuf;

use anyhow::Context;
use crosscheck_core::prelude::RuntimeArguments;
use crosscheck_runner::prelude::{CommandLine, HarnessResult, SharedCommandExecutor};

use crate::args::{build_args, StressCommand};

/// The binary target of the reimplementation in the cql-stress workspace.
pub const CQL_STRESS_BIN: &str = "cql-stress-cassandra-stress";

/// Runs one stress tool implementation. The two implementations differ only in how they are
/// launched.
pub struct StressToolRunner {
    name: String,
    launch: CommandLine,
    command_executor: SharedCommandExecutor,
}

impl StressToolRunner {
    /// Any launch command that accepts the cassandra-stress grammar after it.
    pub fn new(
        name: impl Into<String>,
        launch: CommandLine,
        command_executor: SharedCommandExecutor,
    ) -> Self {
        Self {
            name: name.into(),
            launch,
            command_executor,
        }
    }

    /// The Apache Cassandra tool at `executable`, usually from [crate::prelude::CassandraInstaller].
    pub fn cassandra_stress(
        command_executor: SharedCommandExecutor,
        executable: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            "cassandra-stress",
            CommandLine::new(executable.into()),
            command_executor,
        )
    }

    /// The reimplementation, built and started by `cargo run` from the current directory.
    pub fn cql_stress(command_executor: SharedCommandExecutor) -> Self {
        Self::new(
            "cql-stress",
            CommandLine::new("cargo").args(["run", "--bin", CQL_STRESS_BIN, "--"]),
            command_executor,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command_line(
        &self,
        command: &StressCommand,
        node_address: &str,
        keyspace: &str,
        runtime_args: &RuntimeArguments,
    ) -> CommandLine {
        self.launch
            .clone()
            .args(build_args(command, node_address, keyspace, runtime_args))
    }

    /// Run the tool to completion. A non-zero exit fails the run, it is never retried.
    pub fn run(
        &self,
        command: &StressCommand,
        node_address: &str,
        keyspace: &str,
        runtime_args: &RuntimeArguments,
    ) -> HarnessResult<()> {
        let command_line = self.command_line(command, node_address, keyspace, runtime_args);
        log::debug!("Running {}: {command_line}", self.name);

        self.command_executor
            .execute_checked(&command_line)
            .with_context(|| format!("{} {} failed", self.name, command.verb()))?;

        Ok(())
    }
}
