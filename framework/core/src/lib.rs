mod keyspace;
mod node;
mod runtime_args;
mod shutdown;

pub mod prelude {
    pub use crate::keyspace::{KeyspaceNamer, KeyspacePair, DEFAULT_TIMESTAMP_FORMAT};
    pub use crate::node::{DatabaseNode, InvalidNodeUriError, DEFAULT_SCYLLA_URI, SCYLLA_URI_ENV};
    pub use crate::runtime_args::{
        InvalidRuntimeArgumentsError, RuntimeArguments, DEFAULT_CONCURRENCY,
        DEFAULT_LOG_INTERVAL_S, DEFAULT_WORKLOAD_SIZE,
    };
    pub use crate::shutdown::{ShutdownHandle, ShutdownListener, ShutdownSignalError};
}
