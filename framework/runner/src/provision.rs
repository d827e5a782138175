//! Provides a disposable Scylla node, run with `docker compose`, for the duration of a scope.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crosscheck_core::prelude::{DatabaseNode, ShutdownListener, ShutdownSignalError};
use indicatif::{ProgressBar, ProgressStyle};

use crate::command::{CommandLine, SharedCommandExecutor};
use crate::executor::Executor;
use crate::teardown::{guarded, TeardownPolicy};
use crate::types::HarnessResult;

pub const DEFAULT_COMPOSE_FILE: &str = "docker/scylla_test/compose.yml";
pub const DEFAULT_SERVICE: &str = "scylla";
pub const READINESS_QUERY: &str = "SELECT now() FROM system.local";

/// Where the compose file publishes the node's CQL port.
const PROVISIONED_ADDRESS: &str = "127.0.0.1";
const PROVISIONED_PORT: &str = "9042";

/// How long to wait for a freshly started node to answer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub backoff: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            backoff: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Scylla didn't start responding after {attempts} attempts")]
    NotResponding { attempts: u32 },
}

/// A Scylla node managed through `docker compose -f <compose_file>`.
pub struct ScyllaDocker {
    command_executor: SharedCommandExecutor,
    executor: Arc<Executor>,
    shutdown_listener: ShutdownListener,
    docker: PathBuf,
    compose_file: PathBuf,
    service: String,
    readiness: ReadinessConfig,
    show_progress: bool,
}

impl ScyllaDocker {
    pub fn new(
        command_executor: SharedCommandExecutor,
        executor: Arc<Executor>,
        compose_file: impl Into<PathBuf>,
    ) -> Self {
        let shutdown_listener = executor.new_listener();
        Self {
            command_executor,
            executor,
            shutdown_listener,
            docker: PathBuf::from("docker"),
            compose_file: compose_file.into(),
            service: DEFAULT_SERVICE.to_string(),
            readiness: ReadinessConfig::default(),
            show_progress: false,
        }
    }

    /// Use this `docker` binary instead of the one in the user's `PATH`.
    pub fn with_docker_path(mut self, docker: impl Into<PathBuf>) -> Self {
        self.docker = docker.into();
        self
    }

    /// The compose service that runs Scylla and that readiness queries are sent to.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessConfig) -> Self {
        self.readiness = readiness;
        self
    }

    /// Show a spinner while waiting for the node.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Start the node, wait for it, run `body` with it and then apply the teardown `policy`.
    ///
    /// A node that never becomes ready counts as a failed scope, so [TeardownPolicy::OnSuccess]
    /// leaves it running for inspection.
    pub fn with_node<T>(
        &self,
        policy: TeardownPolicy,
        body: impl FnOnce(&DatabaseNode) -> HarnessResult<T>,
    ) -> HarnessResult<T> {
        log::info!("Setting up Scylla");
        self.start()?;

        guarded(
            policy,
            || {
                let node = self.wait_until_responding()?;
                body(&node)
            },
            || self.teardown(),
        )
    }

    /// Start the container in the background.
    pub fn start(&self) -> HarnessResult<()> {
        log::info!("Starting the container");
        self.command_executor
            .execute_checked(&self.compose().args(["up", "-d"]))
            .context("Failed to start Scylla")?;
        Ok(())
    }

    /// Poll the node with a trivial query until it answers.
    ///
    /// Fails with [ProvisionError::NotResponding] once `max_attempts` queries have failed, or
    /// straight away with a [ShutdownSignalError] if interrupted.
    pub fn wait_until_responding(&self) -> HarnessResult<DatabaseNode> {
        log::info!("Waiting for Scylla to respond to queries");
        let spinner = self.spinner();
        let probe = self.compose().args([
            "exec",
            "-T",
            self.service.as_str(),
            "cqlsh",
            "-e",
            READINESS_QUERY,
        ]);

        for attempt in 1..=self.readiness.max_attempts {
            if self.shutdown_listener.should_shutdown() {
                spinner.finish_and_clear();
                return Err(ShutdownSignalError::default().into());
            }
            spinner.set_message(format!(
                "attempt {attempt}/{}",
                self.readiness.max_attempts
            ));

            match self.command_executor.execute(&probe) {
                Ok(status) if status.success() => {
                    spinner.finish_and_clear();
                    log::info!("Scylla is responding after {attempt} attempt(s)");
                    return Ok(DatabaseNode::new(PROVISIONED_ADDRESS, PROVISIONED_PORT));
                }
                Ok(status) => log::debug!("Readiness attempt {attempt} failed with {status}"),
                Err(e) => log::debug!("Readiness attempt {attempt} failed: {e}"),
            }

            if self.shutdown_listener.should_shutdown() {
                spinner.finish_and_clear();
                return Err(ShutdownSignalError::default().into());
            }
            if attempt < self.readiness.max_attempts {
                if let Err(e) = self.executor.sleep(self.readiness.backoff) {
                    spinner.finish_and_clear();
                    return Err(e);
                }
            }
        }

        spinner.finish_and_clear();
        Err(ProvisionError::NotResponding {
            attempts: self.readiness.max_attempts,
        }
        .into())
    }

    /// Stop and remove the container.
    pub fn teardown(&self) -> HarnessResult<()> {
        log::info!("Tearing down");
        self.command_executor
            .execute_checked(&self.compose().arg("stop"))
            .context("Failed to stop Scylla")?;
        self.command_executor
            .execute_checked(&self.compose().arg("down"))
            .context("Failed to remove Scylla")?;
        log::info!("Teardown successful");
        Ok(())
    }

    fn compose(&self) -> CommandLine {
        CommandLine::new(&self.docker)
            .args(["compose", "-f"])
            .arg(&self.compose_file)
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} Waiting for Scylla {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
