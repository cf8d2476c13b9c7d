//! Run summary and its human-readable rendering.

use crate::record::{ScenarioRecord, ScenarioStatus};
use crate::recorder::final_attempts;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Distinct scenarios, retries folded in.
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Passed only after at least one retry.
    pub flaky: usize,
    /// Attempts across all scenarios.
    pub attempts: usize,
}

impl Summary {
    pub fn from_records(records: &[ScenarioRecord]) -> Self {
        let outcomes = final_attempts(records.to_vec());
        let mut summary = Summary {
            total: outcomes.len(),
            attempts: records.len(),
            ..Default::default()
        };
        for record in &outcomes {
            match record.status {
                ScenarioStatus::Passed => {
                    summary.passed += 1;
                    if record.attempt > 1 {
                        summary.flaky += 1;
                    }
                }
                ScenarioStatus::Skipped => summary.skipped += 1,
                // A scenario still running at report time never finished.
                ScenarioStatus::Failed | ScenarioStatus::Running => summary.failed += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Plain-text pass/fail report, one line per scenario.
pub fn render_text(summary: &Summary, outcomes: &[ScenarioRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} scenarios ({} passed, {} failed, {} skipped, {} flaky) in {} attempts",
        summary.total, summary.passed, summary.failed, summary.skipped, summary.flaky, summary.attempts
    );
    for record in outcomes {
        let _ = write!(
            out,
            "  [{}] {} / {}",
            record.status, record.feature, record.name
        );
        if record.attempt > 1 {
            let _ = write!(out, " (attempt {})", record.attempt);
        }
        if let Some(ms) = record.duration_ms() {
            let _ = write!(out, " {ms}ms");
        }
        out.push('\n');
        if let Some(error) = &record.error {
            let _ = writeln!(out, "      {error}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, attempt: usize, status: ScenarioStatus) -> ScenarioRecord {
        let mut record = ScenarioRecord::new("Checkout", name, vec![], None, attempt);
        record.status = status;
        record
    }

    #[test]
    fn counts_final_outcomes() {
        let records = vec![
            record("guest", 1, ScenarioStatus::Failed),
            record("guest", 2, ScenarioStatus::Passed),
            record("registered", 1, ScenarioStatus::Failed),
            record("coupon", 1, ScenarioStatus::Skipped),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(
            summary,
            Summary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
                flaky: 1,
                attempts: 4,
            }
        );
        assert!(!summary.is_success());
    }

    #[test]
    fn text_report_lists_failures_with_their_error() {
        let mut failed = record("registered", 1, ScenarioStatus::Failed);
        failed.error = Some("Element '#button-confirm' not visible within 30s".into());
        let outcomes = vec![record("guest", 2, ScenarioStatus::Passed), failed];
        let summary = Summary::from_records(&outcomes);

        let text = render_text(&summary, &outcomes);
        assert!(text.starts_with("2 scenarios (1 passed, 1 failed"));
        assert!(text.contains("[PASSED] Checkout / guest (attempt 2)"));
        assert!(text.contains("[FAILED] Checkout / registered"));
        assert!(text.contains("#button-confirm"));
    }
}
