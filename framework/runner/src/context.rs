use std::sync::Arc;

use crosscheck_core::prelude::{DatabaseNode, RuntimeArguments, ShutdownListener};

use crate::command::SharedCommandExecutor;
use crate::executor::Executor;

/// Everything a scenario body needs to drive the stress tools against a live node.
pub struct ScenarioContext {
    name: String,
    node: DatabaseNode,
    runtime_args: RuntimeArguments,
    command_executor: SharedCommandExecutor,
    executor: Arc<Executor>,
}

impl ScenarioContext {
    pub(crate) fn new(
        name: String,
        node: DatabaseNode,
        runtime_args: RuntimeArguments,
        command_executor: SharedCommandExecutor,
        executor: Arc<Executor>,
    ) -> Self {
        Self {
            name,
            node,
            runtime_args,
            command_executor,
            executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> &DatabaseNode {
        &self.node
    }

    pub fn runtime_args(&self) -> &RuntimeArguments {
        &self.runtime_args
    }

    /// Runs the stress tools and any other external command of the scenario.
    pub fn command_executor(&self) -> &SharedCommandExecutor {
        &self.command_executor
    }

    /// Check this between tool runs so an interrupt stops the scenario before the next one starts.
    pub fn shutdown_listener(&self) -> ShutdownListener {
        self.executor.new_listener()
    }
}
