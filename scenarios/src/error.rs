use crosscheck_core::prelude::{ShutdownListener, ShutdownSignalError};
use crosscheck_runner::prelude::HarnessResult;

/// The tools ran, but what they produced did not pass validation.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("Validation failed: {msg}")]
pub struct ValidationFailed {
    msg: String,
}

impl ValidationFailed {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Stop a scenario between two tool runs once an interrupt has been received.
pub(crate) fn stop_if_interrupted(shutdown: &ShutdownListener) -> HarnessResult<()> {
    if shutdown.should_shutdown() {
        log::warn!("Interrupted, not starting the next tool run");
        return Err(ShutdownSignalError::default().into());
    }
    Ok(())
}
