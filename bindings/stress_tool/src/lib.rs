mod args;
mod install;
mod runner;

pub mod prelude {
    pub use crate::args::{build_args, StressCommand};
    pub use crate::install::{
        CassandraInstaller, CASSANDRA_MIRROR, CASSANDRA_STRESS_PATH_ENV,
        DEFAULT_CASSANDRA_VERSION, DEFAULT_DOWNLOAD_DIR,
    };
    pub use crate::runner::{StressToolRunner, CQL_STRESS_BIN};
}
