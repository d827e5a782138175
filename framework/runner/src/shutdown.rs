use crosscheck_core::prelude::ShutdownHandle;
use tokio::signal;

/// Turn Ctrl-C into a shutdown signal instead of letting it kill the harness, so that teardown
/// still gets a chance to run.
pub(crate) fn start_shutdown_listener(runtime: &tokio::runtime::Runtime) -> ShutdownHandle {
    let handle = ShutdownHandle::default();

    let listener_handle = handle.clone();
    runtime.spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                log::warn!("Received interrupt, stopping");
                listener_handle.shutdown();
            }
            Err(e) => log::error!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    handle
}
