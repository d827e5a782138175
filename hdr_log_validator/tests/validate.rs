use std::io::Write;
use std::path::Path;

use hdr_log_validator::prelude::{check, validate, HdrLogError};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const HEADER: &str = "#[Logged with Cql-stress 0.1.0]
#[StartTime: 1700000000.000 (seconds since epoch), Tue Nov 14 22:13:20 UTC 2023]
#[BaseTime: 0.000 (seconds since epoch)]
#[MaxValueDivisor: 1000000.000]
";

fn hlog(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn row(timestamp: f64, interval: f64) -> String {
    format!("Tag=write,{timestamp:.3},{interval:.3},4.944,HISTFAAAACh4nJNpmSzMwMDAxQABzFCaEUzOmcLoAhFgBAAqtQJj")
}

fn rows(cadence: &[(f64, f64)]) -> Vec<String> {
    cadence.iter().map(|&(t, i)| row(t, i)).collect()
}

fn as_str(rows: &[String]) -> Vec<&str> {
    rows.iter().map(String::as_str).collect()
}

#[test]
fn valid_log() {
    let data = rows(&[(1.002, 1.0), (2.001, 0.999), (3.0, 1.0), (3.4, 0.4)]);
    let file = hlog(&as_str(&data));

    let summary = check(file.path(), 1.0).unwrap();

    assert_eq!(summary.data_rows, 4);
    assert_eq!(summary.first_timestamp, Some(1.002));
    assert_eq!(summary.last_timestamp, Some(3.4));
    assert!(validate(file.path(), 1.0));
}

#[test]
fn valid_log_with_custom_interval() {
    let data = rows(&[(2.0, 2.0), (4.05, 2.0), (6.0, 1.95), (7.1, 1.1)]);
    let file = hlog(&as_str(&data));

    assert!(validate(file.path(), 2.0));
    assert!(!validate(file.path(), 1.0));
}

#[test]
fn truncated_last_row_is_accepted() {
    let mut data = rows(&[(1.0, 1.0), (2.0, 1.0)]);
    data.push("Tag=write,2.5".to_string());
    let file = hlog(&as_str(&data));

    let summary = check(file.path(), 1.0).unwrap();
    assert_eq!(summary.data_rows, 2);
}

#[test]
fn header_without_data_rows_is_too_short() {
    let file = hlog(&[]);
    assert_eq!(
        check(file.path(), 1.0).unwrap_err(),
        HdrLogError::TooFewLines { lines: 4 }
    );
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hdr_log.hlog");

    assert!(matches!(
        check(&path, 1.0),
        Err(HdrLogError::Missing { .. })
    ));
    assert!(!validate(&path, 1.0));
}

#[test]
fn empty_file() {
    let file = NamedTempFile::new().unwrap();

    assert!(matches!(
        check(file.path(), 1.0),
        Err(HdrLogError::Empty { .. })
    ));
    assert!(!validate(file.path(), 1.0));
}

#[test]
fn header_line_missing_its_substring() {
    let mut file = NamedTempFile::new().unwrap();
    let broken = HEADER.replace("#[StartTime:", "#[Start:");
    file.write_all(broken.as_bytes()).unwrap();
    writeln!(file, "{}", row(1.0, 1.0)).unwrap();
    file.flush().unwrap();

    let err = check(file.path(), 1.0).unwrap_err();

    assert!(matches!(
        err,
        HdrLogError::HeaderMismatch {
            line: 2,
            expected: "#[StartTime:",
            ..
        }
    ));
    assert!(!validate(file.path(), 1.0));
}

#[test]
fn non_last_row_with_three_fields() {
    let first = row(1.0, 1.0);
    let file = hlog(&[first.as_str(), "Tag=write,2.0,1.0", row(3.0, 1.0).as_str()]);

    assert_eq!(
        check(file.path(), 1.0).unwrap_err(),
        HdrLogError::MalformedRow {
            line: 6,
            row: "Tag=write,2.0,1.0".to_string()
        }
    );
}

#[test]
fn row_without_tag() {
    let first = row(1.0, 1.0);
    let file = hlog(&[first.as_str(), "write,2.0,1.0,0.9,AAAA", row(3.0, 1.0).as_str()]);

    assert!(matches!(
        check(file.path(), 1.0),
        Err(HdrLogError::MissingTag { line: 6, .. })
    ));
}

#[test]
fn non_numeric_timestamp() {
    let file = hlog(&["Tag=write,one,1.0,0.9,AAAA", row(2.0, 1.0).as_str()]);

    assert!(matches!(
        check(file.path(), 1.0),
        Err(HdrLogError::InvalidNumber { line: 5, .. })
    ));
}

#[test]
fn first_timestamp_far_from_interval() {
    let data = rows(&[(1.5, 1.0), (2.5, 1.0), (3.5, 1.0)]);
    let file = hlog(&as_str(&data));

    assert!(matches!(
        check(file.path(), 1.0),
        Err(HdrLogError::FirstTimestamp { line: 5, .. })
    ));
}

#[test]
fn cadence_deviation() {
    let data = rows(&[(1.0, 1.0), (2.2, 1.0), (3.2, 1.0), (4.0, 0.8)]);
    let file = hlog(&as_str(&data));

    let err = check(file.path(), 1.0).unwrap_err();

    assert!(matches!(err, HdrLogError::TimestampDrift { line: 6, .. }));
    assert!(!validate(file.path(), 1.0));
}

#[test]
fn interval_length_deviation() {
    let data = rows(&[(1.0, 1.0), (2.0, 1.2), (3.0, 1.0), (3.5, 0.5)]);
    let file = hlog(&as_str(&data));

    assert!(matches!(
        check(file.path(), 1.0),
        Err(HdrLogError::IntervalDrift { line: 6, .. })
    ));
}

#[test]
fn diagnostic_names_the_line() {
    let data = rows(&[(1.0, 1.0), (2.2, 1.0), (3.2, 1.0)]);
    let file = hlog(&as_str(&data));

    let message = check(Path::new(file.path()), 1.0).unwrap_err().to_string();

    assert_eq!(
        message,
        "Timestamp 2.2 on line 6 does not match expected 2 (previous + interval)"
    );
}
