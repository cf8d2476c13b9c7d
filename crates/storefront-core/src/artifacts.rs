//! Artifact naming and output directory layout

use crate::config::Config;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn screenshot_file_name(scenario: &str, status: &str) -> String {
    format!("{}-{}.png", sanitize_name(scenario), status)
}

pub fn console_log_file_name(scenario: &str) -> String {
    format!("{}-console-errors.log", sanitize_name(scenario))
}

pub fn console_log_content(scenario: &str, at: DateTime<Utc>, errors: &[String]) -> String {
    let mut lines = vec![
        format!("Console errors for scenario: {scenario}"),
        format!("Date: {}", at.to_rfc3339()),
        "-------------------------------------------".to_string(),
    ];
    lines.extend(errors.iter().cloned());
    lines.join("\n")
}

/// Creates the screenshot, video and log directories under the reports root.
pub fn prepare_directories(config: &Config) -> Result<Vec<PathBuf>> {
    let dirs = vec![
        config.screenshots_dir(),
        config.videos_dir(),
        config.logs_dir(),
    ];
    for dir in &dirs {
        create_dir_if_missing(dir)?;
    }
    Ok(dirs)
}

pub fn create_dir_if_missing(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Writes `contents`, creating parent directories as needed.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_if_missing(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
