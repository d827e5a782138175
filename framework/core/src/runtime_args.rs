use std::path::{Path, PathBuf};

pub const DEFAULT_WORKLOAD_SIZE: u64 = 100;
pub const DEFAULT_CONCURRENCY: u64 = 1;
/// The stress tools log HDR histograms every second unless told otherwise.
pub const DEFAULT_LOG_INTERVAL_S: f64 = 1.0;

/// Workload settings shared, read-only, by every step of a scenario.
///
/// Constructed with [RuntimeArguments::new] and the `with_*` methods, which validate their input,
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeArguments {
    workload_size: u64,
    concurrency: u64,
    throttle: Option<String>,
    hdr_log_file: Option<PathBuf>,
    log_interval_s: f64,
}

impl Default for RuntimeArguments {
    fn default() -> Self {
        Self {
            workload_size: DEFAULT_WORKLOAD_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            throttle: None,
            hdr_log_file: None,
            log_interval_s: DEFAULT_LOG_INTERVAL_S,
        }
    }
}

impl RuntimeArguments {
    pub fn new(workload_size: u64, concurrency: u64) -> Result<Self, InvalidRuntimeArgumentsError> {
        if workload_size == 0 {
            return Err(InvalidRuntimeArgumentsError::new("workload size must be positive"));
        }
        if concurrency == 0 {
            return Err(InvalidRuntimeArgumentsError::new("concurrency must be positive"));
        }

        Ok(Self {
            workload_size,
            concurrency,
            ..Default::default()
        })
    }

    /// Limit the operation rate, for example `500/s`.
    pub fn with_throttle(
        mut self,
        throttle: impl Into<String>,
    ) -> Result<Self, InvalidRuntimeArgumentsError> {
        let throttle = throttle.into();
        if throttle.trim().is_empty() || throttle.contains(char::is_whitespace) {
            return Err(InvalidRuntimeArgumentsError::new(format!(
                "throttle '{throttle}' must be a single non-empty token"
            )));
        }
        self.throttle = Some(throttle);
        Ok(self)
    }

    /// Log HDR histograms to `path`, at the interval set by [RuntimeArguments::with_log_interval].
    pub fn with_hdr_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.hdr_log_file = Some(path.into());
        self
    }

    /// Seconds between two HDR log entries, whether or not a log file has been chosen yet.
    pub fn with_log_interval(
        mut self,
        interval_s: f64,
    ) -> Result<Self, InvalidRuntimeArgumentsError> {
        if !interval_s.is_finite() || interval_s <= 0.0 {
            return Err(InvalidRuntimeArgumentsError::new(format!(
                "log interval must be a positive number of seconds, got {interval_s}"
            )));
        }
        self.log_interval_s = interval_s;
        Ok(self)
    }

    pub fn workload_size(&self) -> u64 {
        self.workload_size
    }

    pub fn concurrency(&self) -> u64 {
        self.concurrency
    }

    pub fn throttle(&self) -> Option<&str> {
        self.throttle.as_deref()
    }

    pub fn hdr_log_file(&self) -> Option<&Path> {
        self.hdr_log_file.as_deref()
    }

    pub fn log_interval_s(&self) -> f64 {
        self.log_interval_s
    }

    /// True when the interval matches what the tools use without an explicit `interval=` clause.
    pub fn has_default_log_interval(&self) -> bool {
        self.log_interval_s == DEFAULT_LOG_INTERVAL_S
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("Invalid runtime arguments: {msg}")]
pub struct InvalidRuntimeArgumentsError {
    msg: String,
}

impl InvalidRuntimeArgumentsError {
    fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
