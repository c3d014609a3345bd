//! Append-only run history.
//!
//! Each evaluation appends one JSON line to a history file, so repeated runs
//! over a planning session accumulate into a reviewable log without ever
//! rewriting earlier entries.

use crate::RunnerError;
use cellplan_engine::{LinkBudgetResult, SignalQuality, Technology};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One recorded evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Scenario name the result was computed for.
    pub scenario: String,
    /// Radio technology.
    pub technology: String,
    /// Indoor received power in dBm.
    pub rsrp_dbm: f64,
    /// Quality tier.
    pub quality: String,
    /// Coverage probability in percent.
    pub coverage_probability_pct: f64,
    /// Whether a small cell was required.
    pub small_cell_required: bool,
}

impl RunRecord {
    /// Build a record from an evaluation result.
    pub fn from_result(scenario: &str, result: &LinkBudgetResult) -> Self {
        RunRecord {
            scenario: scenario.to_owned(),
            technology: result.technology.as_str().to_owned(),
            rsrp_dbm: result.rsrp_dbm,
            quality: result.quality.as_str().to_owned(),
            coverage_probability_pct: result.coverage_probability_pct,
            small_cell_required: result.small_cell_required,
        }
    }

    /// Parse the technology back from its recorded name.
    pub fn technology(&self) -> Option<Technology> {
        match self.technology.as_str() {
            "4G" => Some(Technology::Lte),
            "5G" => Some(Technology::Nr),
            _ => None,
        }
    }

    /// Parse the quality tier back from its recorded name.
    pub fn quality(&self) -> Option<SignalQuality> {
        [
            SignalQuality::Excellent,
            SignalQuality::Good,
            SignalQuality::Medium,
            SignalQuality::Weak,
            SignalQuality::Critical,
        ]
        .into_iter()
        .find(|q| q.as_str() == self.quality)
    }
}

/// JSON-lines history file.
#[derive(Debug, Clone)]
pub struct RunHistory {
    path: PathBuf,
}

impl RunHistory {
    /// Open a history at `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RunHistory { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn append(&self, record: &RunRecord) -> Result<(), RunnerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Load every record, oldest first. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<RunRecord>, RunnerError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}
