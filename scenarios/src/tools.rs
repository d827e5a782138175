use std::path::PathBuf;

use crosscheck_runner::prelude::SharedCommandExecutor;
use stress_tool_bindings::prelude::StressToolRunner;

/// Both implementations under comparison.
pub struct StressTools {
    /// Apache `cassandra-stress`.
    pub reference: StressToolRunner,
    /// `cql-stress-cassandra-stress`.
    pub reimplementation: StressToolRunner,
}

impl StressTools {
    pub fn new(reference: StressToolRunner, reimplementation: StressToolRunner) -> Self {
        Self {
            reference,
            reimplementation,
        }
    }

    /// The installed reference tool at `cassandra_stress` and the reimplementation run by `cargo`.
    pub fn installed(
        command_executor: &SharedCommandExecutor,
        cassandra_stress: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            StressToolRunner::cassandra_stress(command_executor.clone(), cassandra_stress),
            StressToolRunner::cql_stress(command_executor.clone()),
        )
    }
}
