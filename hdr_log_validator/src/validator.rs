use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::HdrLogError;

/// Substrings that the first four lines of the log must contain, in this order.
pub const EXPECTED_HEADERS: [&str; 4] = [
    "Logged with Cql-stress",
    "#[StartTime:",
    "#[BaseTime:",
    "#[MaxValueDivisor:",
];

pub const TAG_PREFIX: &str = "Tag=";

/// Allowed deviation, in seconds, of every timestamp and interval length.
pub const TOLERANCE_S: f64 = 0.1;

const HEADER_LINES: usize = EXPECTED_HEADERS.len();
const MIN_FIELDS: usize = 4;

/// What a valid log contained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HdrLogSummary {
    /// Data rows that passed validation. A truncated last row is not counted.
    pub data_rows: usize,
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
}

/// Like [check], logging the reason when the log is invalid.
pub fn validate(path: impl AsRef<Path>, expected_interval: f64) -> bool {
    match check(path, expected_interval) {
        Ok(summary) => {
            log::info!("Successfully validated {} data rows", summary.data_rows);
            true
        }
        Err(e) => {
            log::error!("{e}");
            false
        }
    }
}

/// Check that the HDR log at `path` has the expected header and that its data rows were written
/// every `expected_interval` seconds.
///
/// The last row may have been cut short when the tool exited, so it is exempt from the field
/// count (a truncated last row is skipped) and from the cadence checks.
pub fn check(path: impl AsRef<Path>, expected_interval: f64) -> Result<HdrLogSummary, HdrLogError> {
    let path = path.as_ref();
    log::info!("Checking HDR file: {}", path.display());

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HdrLogError::Missing {
            path: path.to_path_buf(),
        },
        _ => HdrLogError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    log::debug!("HDR file size: {} bytes", metadata.len());
    if metadata.len() == 0 {
        return Err(HdrLogError::Empty {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| HdrLogError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= HEADER_LINES {
        return Err(HdrLogError::TooFewLines { lines: lines.len() });
    }

    for (index, expected) in EXPECTED_HEADERS.into_iter().enumerate() {
        if !lines[index].contains(expected) {
            return Err(HdrLogError::HeaderMismatch {
                line: index + 1,
                expected,
                found: lines[index].trim().to_string(),
            });
        }
    }
    log::debug!("All header lines validated successfully");

    let summary = check_rows(&lines[HEADER_LINES..], expected_interval)?;
    if summary.data_rows == 0 {
        log::warn!("No data rows found in HDR file");
    }
    Ok(summary)
}

fn check_rows(lines: &[&str], expected_interval: f64) -> Result<HdrLogSummary, HdrLogError> {
    let rows: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .map(|(index, row)| (HEADER_LINES + index + 1, row.trim()))
        .filter(|(_, row)| !row.is_empty())
        .collect();

    let mut summary = HdrLogSummary::default();
    let mut previous_timestamp: Option<f64> = None;

    for (index, &(line, row)) in rows.iter().enumerate() {
        let is_last = index + 1 == rows.len();

        // Example row: Tag=write,5.449,5.002,4.944,<histogram>
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < MIN_FIELDS {
            if is_last {
                log::debug!("Skipping truncated last row on line {line}");
                break;
            }
            return Err(HdrLogError::MalformedRow {
                line,
                row: row.to_string(),
            });
        }

        if !fields[0].starts_with(TAG_PREFIX) {
            return Err(HdrLogError::MissingTag {
                line,
                row: row.to_string(),
            });
        }

        let timestamp = parse_seconds(fields[1], line, row)?;
        let interval = parse_seconds(fields[2], line, row)?;

        if index == 0 && (timestamp - expected_interval).abs() > TOLERANCE_S {
            return Err(HdrLogError::FirstTimestamp {
                line,
                timestamp,
                expected: expected_interval,
            });
        }

        if !is_last {
            if let Some(previous) = previous_timestamp {
                let expected = previous + expected_interval;
                if (timestamp - expected).abs() > TOLERANCE_S {
                    return Err(HdrLogError::TimestampDrift {
                        line,
                        timestamp,
                        expected,
                    });
                }
            }

            if (interval - expected_interval).abs() > TOLERANCE_S {
                return Err(HdrLogError::IntervalDrift {
                    line,
                    interval,
                    expected: expected_interval,
                });
            }
        }

        previous_timestamp = Some(timestamp);
        summary.data_rows += 1;
        summary.first_timestamp.get_or_insert(timestamp);
        summary.last_timestamp = Some(timestamp);
    }

    Ok(summary)
}

fn parse_seconds(field: &str, line: usize, row: &str) -> Result<f64, HdrLogError> {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(HdrLogError::InvalidNumber {
            line,
            row: row.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_rows_are_ignored() {
        let rows = [
            "Tag=write,1.0,1.0,0.9,AAAA",
            "",
            "   ",
            "Tag=write,2.0,1.0,0.9,AAAA",
            "Tag=write,2.4",
        ];

        let summary = check_rows(&rows, 1.0).unwrap();

        assert_eq!(summary.data_rows, 2);
        assert_eq!(summary.last_timestamp, Some(2.0));
    }

    #[test]
    fn line_numbers_count_header() {
        let rows = ["Tag=write,1.0,1.0,0.9,AAAA", "Tag=write,1.0,1.0", "Tag=write,3.0,1.0,0.9,AAAA"];

        let err = check_rows(&rows, 1.0).unwrap_err();

        assert_eq!(
            err,
            HdrLogError::MalformedRow {
                line: 6,
                row: "Tag=write,1.0,1.0".to_string()
            }
        );
    }

    #[test]
    fn complete_last_row_is_exempt_from_cadence() {
        let rows = ["Tag=write,1.0,1.0,0.9,AAAA", "Tag=write,5.0,0.2,0.1,AAAA"];
        assert_eq!(check_rows(&rows, 1.0).unwrap().data_rows, 2);
    }

    #[test]
    fn complete_last_row_still_needs_tag_and_numbers() {
        let rows = ["Tag=write,1.0,1.0,0.9,AAAA", "write,2.0,1.0,0.9,AAAA"];
        assert!(matches!(
            check_rows(&rows, 1.0),
            Err(HdrLogError::MissingTag { line: 6, .. })
        ));

        let rows = ["Tag=write,1.0,1.0,0.9,AAAA", "Tag=write,nan,1.0,0.9,AAAA"];
        assert!(matches!(
            check_rows(&rows, 1.0),
            Err(HdrLogError::InvalidNumber { line: 6, .. })
        ));
    }

    #[test]
    fn single_row_is_checked_as_first() {
        let rows = ["Tag=write,3.0,1.0,0.9,AAAA"];
        assert!(matches!(
            check_rows(&rows, 1.0),
            Err(HdrLogError::FirstTimestamp { line: 5, .. })
        ));
    }
}
