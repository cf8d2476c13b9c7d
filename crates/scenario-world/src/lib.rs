//! # Scenario World
//!
//! Runs the storefront feature files: the per-scenario [`ScenarioContext`],
//! the process-wide [`RunState`] holding the shared browser, the lifecycle
//! [`hooks`], the closed [`Action`] set with its handlers, the step
//! definitions and the profile-driven [`runner`].

pub mod action;
pub mod context;
mod handlers;
pub mod hooks;
pub mod profile;
pub mod run_state;
pub mod runner;
mod steps;

pub use action::{Action, ComparisonEntry, SuccessKind};
pub use context::{ScenarioContext, ScenarioInfo};
pub use profile::Profile;
pub use run_state::RunState;
pub use runner::{run, RunOptions, ScenarioFilter, CUCUMBER_REPORT_FILE, FEATURES_DIR};
