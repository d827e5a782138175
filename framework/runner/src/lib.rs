mod bin_path;
mod cli;
mod command;
mod context;
mod executor;
mod init;
mod provision;
mod run;
mod shutdown;
mod summary;
mod teardown;
mod types;

#[cfg(any(test, feature = "test_utils"))]
pub mod testing;

pub mod prelude {
    pub use crate::bin_path::{binary_path, cargo_path, docker_path, CARGO_PATH_ENV, DOCKER_PATH_ENV};
    pub use crate::cli::{HarnessCli, DEFAULT_PROFILE_DIR};
    pub use crate::command::{
        CommandError, CommandExecutor, CommandLine, CommandStatus, SharedCommandExecutor,
        SystemCommandExecutor,
    };
    pub use crate::context::ScenarioContext;
    pub use crate::executor::Executor;
    pub use crate::init::init;
    pub use crate::provision::{
        ProvisionError, ReadinessConfig, ScyllaDocker, DEFAULT_COMPOSE_FILE, DEFAULT_SERVICE,
        READINESS_QUERY,
    };
    pub use crate::run::{run, run_with};
    pub use crate::summary::{append_run_summary, load_run_summaries, RunOutcome, RunSummary};
    pub use crate::teardown::{guarded, TeardownPolicy};
    pub use crate::types::HarnessResult;
}
