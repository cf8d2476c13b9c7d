//! Per-scenario result records and their attachments.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScenarioStatus {
    Running,
    Passed,
    Failed,
    Skipped,
}

impl ScenarioStatus {
    /// Upper-case label used in artifact names, e.g. `Add_to_cart-FAILED.png`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioStatus::Running => "RUNNING",
            ScenarioStatus::Passed => "PASSED",
            ScenarioStatus::Failed => "FAILED",
            ScenarioStatus::Skipped => "SKIPPED",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScenarioStatus::Failed)
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment payload; binary data is stored base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "body", rename_all = "lowercase")]
pub enum AttachmentData {
    Text(String),
    Base64(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub mime_type: String,
    pub data: AttachmentData,
}

impl Attachment {
    pub fn text(mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: AttachmentData::Text(text.into()),
        }
    }

    pub fn binary(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: AttachmentData::Base64(STANDARD.encode(bytes)),
        }
    }

    pub fn png(bytes: &[u8]) -> Self {
        Self::binary("image/png", bytes)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::text("text/plain", text)
    }

    /// Raw payload bytes; `None` if stored base64 is corrupt.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        match &self.data {
            AttachmentData::Text(text) => Some(text.as_bytes().to_vec()),
            AttachmentData::Base64(encoded) => STANDARD.decode(encoded).ok(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            AttachmentData::Text(text) => text.len(),
            AttachmentData::Base64(encoded) => encoded.len() / 4 * 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One attempt at one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: Uuid,
    pub feature: String,
    pub name: String,
    pub tags: Vec<String>,
    /// `path:line` of the scenario, used by the rerun list.
    pub location: Option<String>,
    /// 1 for the first run, 2 for the first retry, ...
    pub attempt: usize,
    pub status: ScenarioStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl ScenarioRecord {
    pub fn new(
        feature: impl Into<String>,
        name: impl Into<String>,
        tags: Vec<String>,
        location: Option<String>,
        attempt: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            feature: feature.into(),
            name: name.into(),
            tags,
            location,
            attempt,
            status: ScenarioStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
            error: None,
            attachments: Vec::new(),
        }
    }

    /// Identity shared by every attempt of the same scenario.
    pub fn key(&self) -> (String, String) {
        (self.feature.clone(), self.name.clone())
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_attachments_round_trip_through_base64() {
        let png = [0x89, b'P', b'N', b'G'];
        let attachment = Attachment::png(&png);
        assert_eq!(attachment.mime_type, "image/png");
        assert!(matches!(attachment.data, AttachmentData::Base64(_)));
        assert_eq!(attachment.bytes().unwrap(), png.to_vec());
    }

    #[test]
    fn attachments_serialize_with_their_encoding() {
        let json = serde_json::to_value(Attachment::plain("Failed at URL: x")).unwrap();
        assert_eq!(json["mime_type"], "text/plain");
        assert_eq!(json["data"]["encoding"], "text");
        assert_eq!(json["data"]["body"], "Failed at URL: x");
    }

    #[test]
    fn statuses_use_upper_case_labels() {
        assert_eq!(ScenarioStatus::Failed.to_string(), "FAILED");
        assert_eq!(
            serde_json::to_value(ScenarioStatus::Passed).unwrap(),
            serde_json::json!("PASSED")
        );
    }
}
