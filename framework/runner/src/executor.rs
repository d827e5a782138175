use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use crosscheck_core::prelude::{ShutdownHandle, ShutdownListener, ShutdownSignalError};

use crate::shutdown::start_shutdown_listener;
use crate::types::HarnessResult;

/// Owns the async runtime that listens for interrupts and lets blocking harness code wait in a
/// way that an interrupt can cut short.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
    shutdown_handle: ShutdownHandle,
}

impl Executor {
    /// Create a runtime and start listening for Ctrl-C.
    pub fn start() -> HarnessResult<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
        let shutdown_handle = start_shutdown_listener(&runtime);

        Ok(Self::new(runtime, shutdown_handle))
    }

    pub fn new(runtime: tokio::runtime::Runtime, shutdown_handle: ShutdownHandle) -> Self {
        Self {
            runtime,
            shutdown_handle,
        }
    }

    pub fn shutdown_handle(&self) -> &ShutdownHandle {
        &self.shutdown_handle
    }

    pub fn new_listener(&self) -> ShutdownListener {
        self.shutdown_handle.new_listener()
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// The future is dropped and a [ShutdownSignalError] returned as soon as an interrupt arrives.
    pub fn execute_in_place<T>(
        &self,
        fut: impl Future<Output = HarnessResult<T>>,
    ) -> HarnessResult<T> {
        let mut shutdown_listener = self.shutdown_handle.new_listener();
        self.runtime.block_on(async move {
            tokio::select! {
                biased;
                _ = shutdown_listener.wait_for_shutdown() => {
                    Err(anyhow::anyhow!(ShutdownSignalError::default()))
                },
                result = fut => result,
            }
        })
    }

    /// Sleep for `duration` unless interrupted first.
    pub fn sleep(&self, duration: Duration) -> HarnessResult<()> {
        self.execute_in_place(async move {
            tokio::time::sleep(duration).await;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn test_executor() -> Executor {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        Executor::new(runtime, ShutdownHandle::new())
    }

    #[test]
    fn sleep_completes() {
        let executor = test_executor();
        executor.sleep(Duration::from_millis(10)).unwrap();
    }

    #[test]
    fn sleep_is_cut_short_by_shutdown() {
        let executor = test_executor();
        executor.shutdown_handle().shutdown();

        let started = Instant::now();
        let err = executor.sleep(Duration::from_secs(60)).unwrap_err();

        assert!(err.is::<ShutdownSignalError>());
        assert!(started.elapsed() < Duration::from_secs(30));
    }
}
