use std::sync::Arc;

use chrono::Utc;

use crate::bin_path::docker_path;
use crate::cli::HarnessCli;
use crate::command::{SharedCommandExecutor, SystemCommandExecutor};
use crate::context::ScenarioContext;
use crate::executor::Executor;
use crate::provision::ScyllaDocker;
use crate::summary::{append_run_summary, RunSummary};
use crate::types::HarnessResult;

/// Run a scenario against the node selected by `cli`, starting real processes.
pub fn run<T>(
    name: &str,
    cli: &HarnessCli,
    scenario: impl FnOnce(&ScenarioContext) -> HarnessResult<T>,
) -> HarnessResult<T> {
    let executor = Arc::new(Executor::start()?);
    run_with(
        name,
        cli,
        Arc::new(SystemCommandExecutor),
        executor,
        scenario,
    )
}

/// Like [run], with the command executor and async executor supplied by the caller.
///
/// With `--provision` the node is started through `docker compose` and torn down according to
/// `--teardown`. Otherwise the scenario runs against `--node`.
pub fn run_with<T>(
    name: &str,
    cli: &HarnessCli,
    command_executor: SharedCommandExecutor,
    executor: Arc<Executor>,
    scenario: impl FnOnce(&ScenarioContext) -> HarnessResult<T>,
) -> HarnessResult<T> {
    log::info!("Running scenario: {name}");
    let mut summary = RunSummary::new(name, Utc::now().timestamp());

    let result = run_scenario(
        name,
        cli,
        command_executor,
        executor,
        &mut summary,
        scenario,
    );

    summary.finish(Utc::now().timestamp(), &result);
    if let Some(path) = &cli.run_summary {
        if let Err(e) = append_run_summary(&summary, path) {
            log::error!(
                "Failed to append run summary to '{}': {e:?}",
                path.display()
            );
        }
    }

    match &result {
        Ok(_) => log::info!("=== Scenario {name} successful ==="),
        Err(e) => log::error!("=== Scenario {name} failed: {e:#} ==="),
    }

    result
}

fn run_scenario<T>(
    name: &str,
    cli: &HarnessCli,
    command_executor: SharedCommandExecutor,
    executor: Arc<Executor>,
    summary: &mut RunSummary,
    scenario: impl FnOnce(&ScenarioContext) -> HarnessResult<T>,
) -> HarnessResult<T> {
    let runtime_args = cli.runtime_arguments()?;

    if cli.provision {
        let docker = ScyllaDocker::new(command_executor.clone(), executor.clone(), &cli.compose_file)
            .with_docker_path(docker_path()?)
            .with_readiness(cli.readiness())
            .with_progress(!cli.no_progress);

        docker.with_node(cli.teardown, |node| {
            summary.node = Some(node.to_string());
            let context = ScenarioContext::new(
                name.to_string(),
                node.clone(),
                runtime_args,
                command_executor,
                executor,
            );
            scenario(&context)
        })
    } else {
        let node = cli.node()?;
        log::info!("Using the node at {node}");
        summary.node = Some(node.to_string());
        let context = ScenarioContext::new(
            name.to_string(),
            node,
            runtime_args,
            command_executor,
            executor,
        );
        scenario(&context)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crosscheck_core::prelude::{DatabaseNode, ShutdownHandle};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::command::CommandLine;
    use crate::summary::{load_run_summaries, RunOutcome};
    use crate::testing::RecordingCommandExecutor;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        harness: HarnessCli,
    }

    fn test_executor() -> Arc<Executor> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        Arc::new(Executor::new(runtime, ShutdownHandle::new()))
    }

    #[test]
    fn runs_against_configured_node_and_records_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary_path = dir.path().join("run_summary.jsonl");
        let summary_arg = summary_path.to_str().unwrap();
        let cli = TestCli::parse_from([
            "test",
            "--node",
            "10.1.1.1:9042",
            "--workload-size",
            "10",
            "--run-summary",
            summary_arg,
        ])
        .harness;
        let commands = Arc::new(RecordingCommandExecutor::succeeding());

        let node = run_with("smoke", &cli, commands.clone(), test_executor(), |ctx| {
            assert_eq!(ctx.name(), "smoke");
            assert_eq!(ctx.runtime_args().workload_size(), 10);
            ctx.command_executor()
                .execute_checked(&CommandLine::new("true"))?;
            Ok(ctx.node().clone())
        })
        .unwrap();

        assert_eq!(node, DatabaseNode::new("10.1.1.1", "9042"));
        assert_eq!(commands.call_count(), 1);

        let summaries = load_run_summaries(&summary_path).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].scenario_name, "smoke");
        assert_eq!(summaries[0].node.as_deref(), Some("10.1.1.1:9042"));
        assert_eq!(summaries[0].outcome, RunOutcome::Success);
    }

    #[test]
    fn failure_is_propagated_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let summary_path = dir.path().join("run_summary.jsonl");
        let cli = TestCli::parse_from([
            "test",
            "--node",
            "10.1.1.1:9042",
            "--run-summary",
            summary_path.to_str().unwrap(),
        ])
        .harness;
        let commands = Arc::new(RecordingCommandExecutor::failing(1));

        let result = run_with("failing", &cli, commands, test_executor(), |ctx| {
            ctx.command_executor()
                .execute_checked(&CommandLine::new("false"))?;
            Ok(())
        });

        assert!(result.is_err());
        let summaries = load_run_summaries(&summary_path).unwrap();
        assert_eq!(summaries[0].outcome, RunOutcome::Failure);
        assert!(summaries[0]
            .error
            .as_deref()
            .unwrap()
            .contains("`false` failed with exit code 1"));
    }

    #[test]
    fn invalid_node_fails_before_scenario() {
        let cli = TestCli::parse_from(["test", "--node", "no-port"]).harness;
        let commands = Arc::new(RecordingCommandExecutor::succeeding());

        let result = run_with::<()>("bad_node", &cli, commands.clone(), test_executor(), |_| {
            panic!("scenario must not run")
        });

        assert!(result.is_err());
        assert_eq!(commands.call_count(), 0);
    }
}
