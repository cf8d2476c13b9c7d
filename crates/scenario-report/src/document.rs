//! The machine-readable result document and the rerun list.

use crate::record::ScenarioRecord;
use crate::recorder::ReportRecorder;
use crate::summary::Summary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use storefront_core::{artifacts, Result};
use tracing::info;

pub const RESULTS_FILE: &str = "storefront-results.json";
pub const RERUN_FILE: &str = "rerun.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDocument {
    pub suite: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    /// Every attempt, oldest first.
    pub scenarios: Vec<ScenarioRecord>,
}

impl RunDocument {
    pub fn from_recorder(recorder: &ReportRecorder) -> Self {
        let scenarios = recorder.records();
        Self {
            suite: storefront_core::BUILD_INFO.to_string(),
            version: storefront_core::VERSION.to_string(),
            started_at: recorder.started_at(),
            finished_at: Utc::now(),
            summary: Summary::from_records(&scenarios),
            scenarios,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        artifacts::write_file(path, json)?;
        info!("Wrote results for {} scenarios to {}", self.summary.total, path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn outcomes(&self) -> Vec<ScenarioRecord> {
        crate::recorder::final_attempts(self.scenarios.clone())
    }
}

/// Writes one line per failed scenario: its `path:line` location, or its
/// name when the location is unknown. An empty file means nothing to rerun.
pub fn write_rerun(path: &Path, failed: &[ScenarioRecord]) -> Result<()> {
    let lines: Vec<String> = failed.iter().map(rerun_line).collect();
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    artifacts::write_file(path, contents)?;
    info!("Wrote {} rerun entries to {}", lines.len(), path.display());
    Ok(())
}

pub fn rerun_line(record: &ScenarioRecord) -> String {
    record
        .location
        .clone()
        .unwrap_or_else(|| record.name.clone())
}

/// Reads a rerun list; a missing file means nothing failed last time.
pub fn read_rerun(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
