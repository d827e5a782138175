use std::io::{BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::HarnessResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    Failure,
}

/// Summary of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// The unique run id
    ///
    /// Chosen by the runner. Unique for each run.
    pub run_id: String,
    pub scenario_name: String,
    /// Unix timestamp in seconds.
    pub started_at: i64,
    /// Unix timestamp in seconds.
    pub finished_at: i64,
    /// `host:port` of the node the scenario ran against, if one was reached
    pub node: Option<String>,
    pub outcome: RunOutcome,
    /// The error chain when the run failed
    pub error: Option<String>,
}

impl RunSummary {
    pub fn new(scenario_name: impl Into<String>, started_at: i64) -> Self {
        Self {
            run_id: nanoid::nanoid!(),
            scenario_name: scenario_name.into(),
            started_at,
            finished_at: started_at,
            node: None,
            outcome: RunOutcome::Success,
            error: None,
        }
    }

    /// Record how the run ended.
    pub fn finish<T>(&mut self, finished_at: i64, result: &HarnessResult<T>) {
        self.finished_at = finished_at;
        match result {
            Ok(_) => {
                self.outcome = RunOutcome::Success;
                self.error = None;
            }
            Err(e) => {
                self.outcome = RunOutcome::Failure;
                self.error = Some(format!("{e:#}"));
            }
        }
    }
}

/// Append the run summary to a file
///
/// The summary is serialized to JSON on a single line followed by a newline. The recommended file
/// extension is `.jsonl`.
pub fn append_run_summary(run_summary: &RunSummary, path: &Path) -> HarnessResult<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    serde_json::to_writer(&mut file, run_summary)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Load run summaries written by [append_run_summary].
pub fn load_run_summaries(path: &Path) -> HarnessResult<Vec<RunSummary>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut runs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        runs.push(serde_json::from_str(&line)?);
    }
    Ok(runs)
}
