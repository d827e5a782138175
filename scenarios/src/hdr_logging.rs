use anyhow::Context;
use crosscheck_runner::prelude::{HarnessResult, ScenarioContext};
use hdr_log_validator::prelude::validate;
use stress_tool_bindings::prelude::{StressCommand, StressToolRunner};

use crate::error::ValidationFailed;

/// Used inside a fresh temporary directory when no `--hdr-log-file` is given.
pub const DEFAULT_HDR_LOG_FILE_NAME: &str = "hdr_log.hlog";

/// Run a `write` with HDR logging enabled and check that the log was written at the configured
/// interval.
pub fn hdr_logging(
    ctx: &ScenarioContext,
    reimplementation: &StressToolRunner,
    keyspace: &str,
) -> HarnessResult<()> {
    let interval = ctx.runtime_args().log_interval_s();

    // Kept alive until the log has been validated.
    let mut scratch_dir = None;
    let hdr_log_file = match ctx.runtime_args().hdr_log_file() {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = tempfile::tempdir().context("Failed to create directory for the HDR log")?;
            let path = dir.path().join(DEFAULT_HDR_LOG_FILE_NAME);
            scratch_dir = Some(dir);
            path
        }
    };
    let runtime_args = ctx.runtime_args().clone().with_hdr_log(&hdr_log_file);

    log::info!("=== Starting the HDR logging test... ===");
    log::info!("=== Running {} with log interval ({interval}s) ===", reimplementation.name());
    reimplementation.run(
        &StressCommand::Write,
        &ctx.node().address,
        keyspace,
        &runtime_args,
    )?;

    if !validate(&hdr_log_file, interval) {
        return Err(ValidationFailed::new(format!(
            "HDR log {} is invalid",
            hdr_log_file.display()
        ))
        .into());
    }
    drop(scratch_dir);

    log::info!("=== HDR logging test successful ===");
    Ok(())
}
