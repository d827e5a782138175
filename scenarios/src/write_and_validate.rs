use crosscheck_core::prelude::KeyspacePair;
use crosscheck_runner::prelude::{HarnessResult, ScenarioContext};
use stress_tool_bindings::prelude::StressCommand;

use crate::error::stop_if_interrupted;
use crate::tools::StressTools;

/// Populate a keyspace with each tool and validate its contents with the other one.
///
/// The reference tool writes `keyspaces.primary` and the reimplementation reads it back, then the
/// reimplementation writes `keyspaces.secondary` and the reference tool reads it back. The first
/// failing run ends the scenario, and so does an interrupt received between two runs.
pub fn write_and_validate(
    ctx: &ScenarioContext,
    tools: &StressTools,
    keyspaces: &KeyspacePair,
) -> HarnessResult<()> {
    let node = &ctx.node().address;
    let runtime_args = ctx.runtime_args();
    let shutdown = ctx.shutdown_listener();

    log::info!("=== Starting the test... ===");

    log::info!(
        "=== Populating database (keyspace={}) with {}... ===",
        keyspaces.primary,
        tools.reference.name()
    );
    tools
        .reference
        .run(&StressCommand::Write, node, &keyspaces.primary, runtime_args)?;

    stop_if_interrupted(&shutdown)?;
    log::info!(
        "=== Validating data (keyspace={}) with {}... ===",
        keyspaces.primary,
        tools.reimplementation.name()
    );
    tools
        .reimplementation
        .run(&StressCommand::Read, node, &keyspaces.primary, runtime_args)?;

    stop_if_interrupted(&shutdown)?;
    log::info!(
        "=== Populating database (keyspace={}) with {}... ===",
        keyspaces.secondary,
        tools.reimplementation.name()
    );
    tools
        .reimplementation
        .run(&StressCommand::Write, node, &keyspaces.secondary, runtime_args)?;

    stop_if_interrupted(&shutdown)?;
    log::info!(
        "=== Validating data (keyspace={}) with {}... ===",
        keyspaces.secondary,
        tools.reference.name()
    );
    tools
        .reference
        .run(&StressCommand::Read, node, &keyspaces.secondary, runtime_args)?;

    log::info!("=== Test successful ===");
    Ok(())
}
