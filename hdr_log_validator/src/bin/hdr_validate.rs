use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hdr_log_validator::prelude::check;

#[derive(Parser, Debug)]
#[command(version, about = "Check an HDR histogram log written by cql-stress")]
struct HdrValidateCli {
    /// The `.hlog` file to check.
    file: PathBuf,

    /// Seconds between two log entries, as passed to the tool's `-log interval=`.
    #[arg(long, default_value = "1")]
    interval: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = HdrValidateCli::parse();

    let summary = check(&cli.file, cli.interval)
        .with_context(|| format!("Invalid HDR log {}", cli.file.display()))?;

    println!(
        "{}: {} data rows, logged every {}s",
        cli.file.display(),
        summary.data_rows,
        cli.interval
    );

    Ok(())
}
