/// Recommended error type for scenario bodies and binaries. Typed errors from this workspace
/// convert into it with `?` and can be recovered with [anyhow::Error::downcast_ref].
pub type HarnessResult<T> = anyhow::Result<T>;
