//! Builds the workspace tests, starts a disposable Scylla node and runs the tests against it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crosscheck_core::prelude::{DatabaseNode, SCYLLA_URI_ENV};
use crosscheck_runner::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Run the test suite against a Scylla node started with docker compose")]
struct WithScyllaCli {
    /// Only run tests whose name contains this string.
    #[arg(long)]
    test_filter: Option<String>,

    /// What to do with the node once the tests have finished.
    #[arg(long, value_enum, default_value_t = TeardownPolicy::Always)]
    teardown: TeardownPolicy,

    #[arg(long, default_value = DEFAULT_COMPOSE_FILE)]
    compose_file: PathBuf,

    /// How many times to query the node before giving up on it.
    #[arg(long, default_value = "30")]
    readiness_attempts: u32,

    #[arg(long, default_value = "false")]
    no_progress: bool,
}

fn main() -> HarnessResult<()> {
    let cli = init::<WithScyllaCli>();

    let cargo = cargo_path()?;
    let commands: SharedCommandExecutor = Arc::new(SystemCommandExecutor);

    // Compile before the node is up so build errors don't leave a container behind.
    log::info!("Building tests");
    commands
        .execute_checked(&CommandLine::new(&cargo).args(["build", "--tests"]))
        .context("Failed to build tests")?;

    let executor = Arc::new(Executor::start()?);
    let docker = ScyllaDocker::new(commands.clone(), executor, &cli.compose_file)
        .with_docker_path(docker_path()?)
        .with_readiness(ReadinessConfig {
            max_attempts: cli.readiness_attempts,
            ..Default::default()
        })
        .with_progress(!cli.no_progress);

    docker.with_node(cli.teardown, |node| {
        log::info!("Running tests");
        commands
            .execute_checked(&test_command(&cargo, cli.test_filter.as_deref(), node))
            .context("Tests failed")?;
        Ok(())
    })
}

/// `cargo test` for the live tests, one at a time since they share the node.
fn test_command(cargo: &Path, filter: Option<&str>, node: &DatabaseNode) -> CommandLine {
    let mut command = CommandLine::new(cargo).arg("test");
    if let Some(filter) = filter {
        command = command.arg(filter);
    }
    command
        .args(["--", "--ignored", "--test-threads=1"])
        .env(SCYLLA_URI_ENV, node.to_string())
}
