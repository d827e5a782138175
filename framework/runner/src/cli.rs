use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use crosscheck_core::prelude::{
    DatabaseNode, RuntimeArguments, DEFAULT_SCYLLA_URI, SCYLLA_URI_ENV,
};

use crate::provision::{ReadinessConfig, DEFAULT_COMPOSE_FILE};
use crate::teardown::TeardownPolicy;
use crate::types::HarnessResult;

/// Where the user-profile workloads live, relative to the workspace root the tools are run from.
pub const DEFAULT_PROFILE_DIR: &str = "scenarios/profiles";

/// Options shared by every harness binary. Flatten into a binary's own parser with
/// `#[command(flatten)]`.
#[derive(Args, Debug, Clone)]
pub struct HarnessCli {
    /// The node to run against, as `host:port`. Ignored with `--provision`.
    #[arg(long, env = SCYLLA_URI_ENV, default_value = DEFAULT_SCYLLA_URI)]
    pub node: String,

    /// Start a disposable Scylla node with `docker compose` instead of using `--node`.
    #[arg(long, default_value = "false")]
    pub provision: bool,

    /// The compose file describing the node to provision.
    #[arg(long, default_value = DEFAULT_COMPOSE_FILE)]
    pub compose_file: PathBuf,

    /// What to do with a provisioned node once the scenario ends.
    #[arg(long, value_enum, default_value_t = TeardownPolicy::Always)]
    pub teardown: TeardownPolicy,

    /// How many times to query a provisioned node before giving up on it.
    #[arg(long, default_value = "30")]
    pub readiness_attempts: u32,

    /// Seconds to wait between two readiness queries.
    #[arg(long, default_value = "2")]
    pub readiness_backoff_s: u64,

    /// Number of operations each stress tool run performs (`n=`).
    #[arg(long, default_value = "100")]
    pub workload_size: u64,

    /// Number of client threads each stress tool run uses (`threads=`).
    #[arg(long, default_value = "1")]
    pub concurrency: u64,

    /// Limit the operation rate of each stress tool run, for example `500/s`.
    #[arg(long)]
    pub throttle: Option<String>,

    /// Log HDR histograms to this file.
    #[arg(long)]
    pub hdr_log_file: Option<PathBuf>,

    /// Seconds between two HDR log entries.
    #[arg(long, default_value = "1")]
    pub log_interval: f64,

    /// Version of Apache Cassandra whose `cassandra-stress` is the reference implementation.
    #[arg(long, default_value = "3.11.16")]
    pub cassandra_version: String,

    /// Where the Cassandra distribution is downloaded and unpacked.
    #[arg(long, default_value = "cassandra-download")]
    pub download_dir: PathBuf,

    /// Directory holding the user-profile workload definitions.
    #[arg(long, default_value = DEFAULT_PROFILE_DIR)]
    pub profile_dir: PathBuf,

    /// Append a JSON line describing each run to this file.
    #[arg(long)]
    pub run_summary: Option<PathBuf>,

    /// Do not show a spinner while waiting for a provisioned node.
    ///
    /// This is recommended for CI/CD environments where nobody is watching and the spinner only adds noise to the logs.
    #[arg(long, default_value = "false")]
    pub no_progress: bool,
}

impl HarnessCli {
    pub fn node(&self) -> HarnessResult<DatabaseNode> {
        self.node
            .parse()
            .with_context(|| format!("Invalid value for --node/{SCYLLA_URI_ENV}"))
    }

    pub fn runtime_arguments(&self) -> HarnessResult<RuntimeArguments> {
        let mut args = RuntimeArguments::new(self.workload_size, self.concurrency)?
            .with_log_interval(self.log_interval)?;
        if let Some(throttle) = &self.throttle {
            args = args.with_throttle(throttle)?;
        }
        if let Some(hdr_log_file) = &self.hdr_log_file {
            args = args.with_hdr_log(hdr_log_file);
        }
        Ok(args)
    }

    pub fn readiness(&self) -> ReadinessConfig {
        ReadinessConfig {
            max_attempts: self.readiness_attempts,
            backoff: Duration::from_secs(self.readiness_backoff_s),
        }
    }
}
