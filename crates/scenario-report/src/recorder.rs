//! Process-wide collection of scenario records.

use crate::record::{Attachment, ScenarioRecord, ScenarioStatus};
use crate::summary::Summary;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_core::{Result, StorefrontError};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Concurrent scenarios record into one shared recorder; each touches only
/// its own entry.
#[derive(Clone)]
pub struct ReportRecorder {
    records: Arc<DashMap<Uuid, ScenarioRecord>>,
    started_at: DateTime<Utc>,
}

impl std::fmt::Debug for ReportRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRecorder")
            .field("records", &self.records.len())
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl ReportRecorder {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            started_at: Utc::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[instrument(skip(self, tags, location))]
    pub fn start(
        &self,
        feature: &str,
        name: &str,
        tags: Vec<String>,
        location: Option<String>,
        attempt: usize,
    ) -> Uuid {
        let record = ScenarioRecord::new(feature, name, tags, location, attempt);
        let id = record.id;
        self.records.insert(id, record);
        debug!("Recording scenario {}", id);
        id
    }

    pub fn attach(&self, id: Uuid, attachment: Attachment) -> Result<()> {
        let mut record = self.record_mut(id)?;
        record.attachments.push(attachment);
        Ok(())
    }

    pub fn finish(&self, id: Uuid, status: ScenarioStatus, error: Option<String>) -> Result<()> {
        let mut record = self.record_mut(id)?;
        record.status = status;
        record.error = error;
        record.finished_at = Some(Utc::now());
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<ScenarioRecord> {
        self.records.get(&id).map(|r| r.clone())
    }

    /// Every attempt, oldest first.
    pub fn records(&self) -> Vec<ScenarioRecord> {
        let mut records: Vec<ScenarioRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.attempt.cmp(&b.attempt))
        });
        records
    }

    /// The last attempt of each scenario.
    pub fn outcomes(&self) -> Vec<ScenarioRecord> {
        final_attempts(self.records())
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(&self.records())
    }

    /// Scenarios whose last attempt failed.
    pub fn failed(&self) -> Vec<ScenarioRecord> {
        self.outcomes()
            .into_iter()
            .filter(|r| r.status.is_failure())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(
        &self,
        id: Uuid,
    ) -> Result<dashmap::mapref::one::RefMut<'_, Uuid, ScenarioRecord>> {
        self.records
            .get_mut(&id)
            .ok_or_else(|| StorefrontError::misuse(format!("no scenario record {id}")))
    }
}

impl Default for ReportRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the highest attempt per scenario, preserving first-seen order.
pub fn final_attempts(records: Vec<ScenarioRecord>) -> Vec<ScenarioRecord> {
    let mut order = Vec::new();
    let mut latest: HashMap<(String, String), ScenarioRecord> = HashMap::new();
    for record in records {
        let key = record.key();
        match latest.get(&key) {
            Some(existing) if existing.attempt > record.attempt => {}
            Some(_) => {
                latest.insert(key, record);
            }
            None => {
                order.push(key.clone());
                latest.insert(key, record);
            }
        }
    }
    order
        .into_iter()
        .filter_map(|key| latest.remove(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retried_scenarios_report_their_last_attempt() {
        let recorder = ReportRecorder::new();
        let first = recorder.start("Cart", "Add to cart", vec![], None, 1);
        recorder
            .finish(first, ScenarioStatus::Failed, Some("timeout".into()))
            .unwrap();
        let retry = recorder.start("Cart", "Add to cart", vec![], None, 2);
        recorder.finish(retry, ScenarioStatus::Passed, None).unwrap();

        assert_eq!(recorder.len(), 2);
        let outcomes = recorder.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, ScenarioStatus::Passed);
        assert!(recorder.failed().is_empty());
    }

    #[test]
    fn attachments_land_on_their_scenario() {
        let recorder = ReportRecorder::new();
        let a = recorder.start("Search", "A", vec!["@smoke".into()], None, 1);
        let b = recorder.start("Search", "B", vec![], None, 1);

        recorder.attach(a, Attachment::plain("hello")).unwrap();
        assert_eq!(recorder.get(a).unwrap().attachments.len(), 1);
        assert!(recorder.get(b).unwrap().attachments.is_empty());
    }

    #[test]
    fn unknown_records_are_misuse() {
        let recorder = ReportRecorder::new();
        let err = recorder
            .finish(Uuid::new_v4(), ScenarioStatus::Passed, None)
            .unwrap_err();
        assert!(err.is_misuse());
    }
}
