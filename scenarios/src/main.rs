use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crosscheck_core::prelude::KeyspaceNamer;
use crosscheck_runner::prelude::*;
use crosscheck_scenarios::prelude::*;
use stress_tool_bindings::prelude::{CassandraInstaller, StressToolRunner};

#[derive(Parser, Debug)]
#[command(version, about = "Cross-validate cassandra-stress and cql-stress against a Scylla node")]
struct CrosscheckCli {
    #[command(subcommand)]
    scenario: Scenario,

    #[command(flatten)]
    harness: HarnessCli,
}

#[derive(Subcommand, Debug, Clone)]
enum Scenario {
    /// Write with each tool and read back with the other one.
    WriteAndValidate,
    /// Round-trip one column type through a user-profile workload.
    UserType {
        #[arg(long = "type")]
        type_name: String,
    },
    /// Round-trip every supported column type.
    UserTypes,
    /// Check the HDR log written by cql-stress.
    HdrLogging,
}

fn main() -> HarnessResult<()> {
    let cli = init::<CrosscheckCli>();
    let harness = &cli.harness;

    match &cli.scenario {
        Scenario::WriteAndValidate => {
            let cassandra_stress = install_reference(harness)?;
            run("write_and_validate", harness, |ctx| {
                let tools = StressTools::installed(ctx.command_executor(), &cassandra_stress);
                write_and_validate(ctx, &tools, &KeyspaceNamer::default().generate())
            })
        }
        Scenario::UserType { type_name } => {
            let cassandra_stress = install_reference(harness)?;
            run(&format!("user_type_{type_name}"), harness, |ctx| {
                let tools = StressTools::installed(ctx.command_executor(), &cassandra_stress);
                user_profile_round_trip(ctx, &tools, &harness.profile_dir, type_name)
            })
        }
        Scenario::UserTypes => {
            let cassandra_stress = install_reference(harness)?;
            run("user_types", harness, |ctx| {
                let tools = StressTools::installed(ctx.command_executor(), &cassandra_stress);
                every_user_type(ctx, &tools, &harness.profile_dir)
            })
        }
        Scenario::HdrLogging => run("hdr_logging", harness, |ctx| {
            let cql_stress = StressToolRunner::cql_stress(ctx.command_executor().clone());
            hdr_logging(ctx, &cql_stress, &KeyspaceNamer::default().generate().secondary)
        }),
    }
}

fn install_reference(harness: &HarnessCli) -> HarnessResult<PathBuf> {
    CassandraInstaller::new(&harness.cassandra_version, &harness.download_dir).install()
}
