use clap::ValueEnum;

use crate::types::HarnessResult;

/// Whether a provisioned resource is destroyed when the scope that uses it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TeardownPolicy {
    /// Tear down regardless of the outcome.
    #[default]
    Always,
    /// Tear down only if the scope completed without error, leaving a failed node for inspection.
    OnSuccess,
    /// Never tear down.
    Never,
}

impl TeardownPolicy {
    pub fn should_teardown(self, succeeded: bool) -> bool {
        match self {
            TeardownPolicy::Always => true,
            TeardownPolicy::OnSuccess => succeeded,
            TeardownPolicy::Never => false,
        }
    }
}

/// Run `body`, then apply `policy` exactly once to decide whether to call `teardown`.
///
/// The scope only counts as successful when `body` returns `Ok`. Teardown is also considered when
/// `body` panics, in which case the scope counts as failed and the panic continues afterwards.
///
/// The outcome of `body` is returned. A teardown error is returned only if `body` succeeded,
/// otherwise it is logged so that it does not hide the original error.
pub fn guarded<T, B, D>(policy: TeardownPolicy, body: B, teardown: D) -> HarnessResult<T>
where
    B: FnOnce() -> HarnessResult<T>,
    D: FnOnce() -> HarnessResult<()>,
{
    let guard = TeardownGuard::new(policy, teardown);
    let result = body();
    let teardown_result = guard.finish(result.is_ok());

    match (result, teardown_result) {
        (Ok(value), None | Some(Ok(()))) => Ok(value),
        (Ok(_), Some(Err(e))) => Err(e.context("Teardown failed")),
        (Err(e), Some(Err(teardown_err))) => {
            log::error!("Teardown failed after an earlier error: {teardown_err:?}");
            Err(e)
        }
        (Err(e), _) => Err(e),
    }
}

struct TeardownGuard<D: FnOnce() -> HarnessResult<()>> {
    policy: TeardownPolicy,
    teardown: Option<D>,
}

impl<D: FnOnce() -> HarnessResult<()>> TeardownGuard<D> {
    fn new(policy: TeardownPolicy, teardown: D) -> Self {
        Self {
            policy,
            teardown: Some(teardown),
        }
    }

    fn finish(mut self, succeeded: bool) -> Option<HarnessResult<()>> {
        let teardown = self.teardown.take()?;
        if self.policy.should_teardown(succeeded) {
            Some(teardown())
        } else {
            log::info!("Skipping teardown, policy is {:?}", self.policy);
            None
        }
    }
}

impl<D: FnOnce() -> HarnessResult<()>> Drop for TeardownGuard<D> {
    fn drop(&mut self) {
        // Only reachable when `body` unwound past `guarded`.
        if let Some(teardown) = self.teardown.take() {
            if self.policy.should_teardown(false) {
                if let Err(e) = teardown() {
                    log::error!("Teardown failed while unwinding: {e:?}");
                }
            }
        }
    }
}
