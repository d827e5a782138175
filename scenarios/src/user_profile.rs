use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use crosscheck_core::prelude::ShutdownSignalError;
use crosscheck_runner::prelude::{HarnessResult, ScenarioContext};
use stress_tool_bindings::prelude::StressCommand;

use crate::error::stop_if_interrupted;
use crate::tools::StressTools;

/// Column types with a user-profile workload in the profile directory.
///
/// `boolean` is missing because the reference tool always generates `true` for it.
pub const SUPPORTED_TYPES: [&str; 12] = [
    "blob", "text", "tinyint", "smallint", "int", "bigint", "float", "double", "inet", "varint",
    "decimal", "uuid",
];

pub fn profile_path(profile_dir: &Path, type_name: &str) -> PathBuf {
    profile_dir.join(format!("{type_name}.yaml"))
}

/// Insert rows of one column type with the reference tool and read them back with the
/// reimplementation, using the workload in `<profile_dir>/<type_name>.yaml`.
pub fn user_profile_round_trip(
    ctx: &ScenarioContext,
    tools: &StressTools,
    profile_dir: &Path,
    type_name: &str,
) -> HarnessResult<()> {
    if !SUPPORTED_TYPES.contains(&type_name) {
        bail!(
            "Unsupported type '{type_name}', expected one of: {}",
            SUPPORTED_TYPES.join(", ")
        );
    }

    let profile = profile_path(profile_dir, type_name);
    if !profile.is_file() {
        bail!("Profile for '{type_name}' not found at {}", profile.display());
    }

    let node = &ctx.node().address;
    let runtime_args = ctx.runtime_args();

    log::info!("=== Inserting {type_name} values with {}... ===", tools.reference.name());
    tools
        .reference
        .run(&StressCommand::user(&profile, "insert"), node, "", runtime_args)
        .with_context(|| format!("Failed to insert {type_name} values"))?;

    stop_if_interrupted(&ctx.shutdown_listener())?;

    log::info!("=== Reading {type_name} values with {}... ===", tools.reimplementation.name());
    tools
        .reimplementation
        .run(&StressCommand::user(&profile, "read"), node, "", runtime_args)
        .with_context(|| format!("Failed to read {type_name} values"))?;

    log::info!("=== {type_name} round trip successful ===");
    Ok(())
}

/// Run [user_profile_round_trip] for every one of [SUPPORTED_TYPES].
///
/// A failing type is logged and the remaining types still run, and the error lists every failed
/// type. An interrupt stops the loop straight away.
pub fn every_user_type(
    ctx: &ScenarioContext,
    tools: &StressTools,
    profile_dir: &Path,
) -> HarnessResult<()> {
    let shutdown = ctx.shutdown_listener();
    let mut failed = Vec::new();
    for type_name in SUPPORTED_TYPES {
        stop_if_interrupted(&shutdown)?;
        if let Err(e) = user_profile_round_trip(ctx, tools, profile_dir, type_name) {
            if e.is::<ShutdownSignalError>() {
                return Err(e);
            }
            log::error!("Type {type_name} failed: {e:?}");
            failed.push(type_name);
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        bail!("Failed types: {}", failed.join(", "))
    }
}
