use tokio::sync::watch::{Receiver, Sender};

/// Broadcasts an interrupt to everything waiting on a [ShutdownListener].
///
/// The signal is latched, so a listener created after [ShutdownHandle::shutdown] was called still
/// observes it.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<bool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::watch::channel(false).0,
        }
    }

    pub fn shutdown(&self) {
        // `send_replace` stores the value even when nobody is subscribed yet.
        if self.sender.send_replace(true) {
            log::debug!("Shutdown was already requested");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn new_listener(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShutdownListener {
    receiver: Receiver<bool>,
}

impl ShutdownListener {
    /// Point in time check whether an interrupt has been received. Long running loops should check
    /// this between steps and stop with a [ShutdownSignalError] when it returns true.
    pub fn should_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until an interrupt is received. Safe to race against other futures so that the
    /// interrupt cancels them.
    pub async fn wait_for_shutdown(&mut self) {
        if self.receiver.wait_for(|requested| *requested).await.is_err() {
            // The handle is gone so no interrupt can arrive any more.
            std::future::pending::<()>().await;
        }
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct ShutdownSignalError {
    msg: String,
}

impl Default for ShutdownSignalError {
    fn default() -> Self {
        Self {
            msg: "Interrupted by shutdown signal".to_string(),
        }
    }
}
