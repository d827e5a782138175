use std::path::PathBuf;

/// The first problem found in an HDR log. Line numbers are 1-based.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HdrLogError {
    #[error("HDR file {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read HDR file {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("HDR file {} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("HDR file has too few lines ({lines})")]
    TooFewLines { lines: usize },

    #[error("Header mismatch on line {line}. Expected '{expected}' in: {found}")]
    HeaderMismatch {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid data row format on line {line}: {row}")]
    MalformedRow { line: usize, row: String },

    #[error("Missing tag on line {line}: {row}")]
    MissingTag { line: usize, row: String },

    #[error("Invalid numeric data on line {line}: {row}")]
    InvalidNumber { line: usize, row: String },

    #[error("First timestamp {timestamp} on line {line} is not close to expected interval {expected}")]
    FirstTimestamp {
        line: usize,
        timestamp: f64,
        expected: f64,
    },

    #[error("Timestamp {timestamp} on line {line} does not match expected {expected} (previous + interval)")]
    TimestampDrift {
        line: usize,
        timestamp: f64,
        expected: f64,
    },

    #[error("Interval length {interval} on line {line} is not close to expected {expected}")]
    IntervalDrift {
        line: usize,
        interval: f64,
        expected: f64,
    },
}
