//! # Scenario Report
//!
//! Records what happened to every scenario attempt (status, timing,
//! screenshots and logs as MIME-tagged attachments) and turns a run into a
//! JSON result document, a rerun list and a plain-text summary.

pub mod document;
pub mod record;
pub mod recorder;
pub mod summary;

pub use document::{read_rerun, write_rerun, RunDocument, RERUN_FILE, RESULTS_FILE};
pub use record::{Attachment, AttachmentData, ScenarioRecord, ScenarioStatus};
pub use recorder::ReportRecorder;
pub use summary::{render_text, Summary};
