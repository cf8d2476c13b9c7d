//! Process-wide state of one run.
//!
//! The browser process is launched once when the run starts and shared by
//! every scenario; scenarios only ever open contexts on it. The state is
//! installed by the run-start hook and taken back by the run-end hook.

use browser_driver::Browser;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use scenario_report::ReportRecorder;
use std::sync::Arc;
use storefront_core::{Config, Result, StorefrontError};
use tracing::debug;

static CURRENT: RwLock<Option<Arc<RunState>>> = parking_lot::const_rwlock(None);

/// Serializes tests that install or take the current run.
#[cfg(test)]
pub(crate) static CURRENT_RUN_TEST_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

pub struct RunState {
    config: Config,
    browser: Mutex<Option<Arc<dyn Browser>>>,
    recorder: ReportRecorder,
    dry_run: bool,
    attempts: DashMap<String, usize>,
}

impl std::fmt::Debug for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunState")
            .field("engine", &self.config.engine)
            .field("base_url", &self.config.base_url)
            .field("browser", &self.browser.lock().is_some())
            .field("dry_run", &self.dry_run)
            .field("recorded", &self.recorder.len())
            .finish()
    }
}

impl RunState {
    pub fn new(config: Config, browser: Option<Arc<dyn Browser>>, dry_run: bool) -> Self {
        Self {
            config,
            browser: Mutex::new(browser),
            recorder: ReportRecorder::new(),
            dry_run,
            attempts: DashMap::new(),
        }
    }

    /// A run that binds steps but never drives a browser.
    pub fn dry(config: Config) -> Self {
        Self::new(config, None, true)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn recorder(&self) -> &ReportRecorder {
        &self.recorder
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// The shared browser; a misuse once it is closed or in a dry run.
    pub fn browser(&self) -> Result<Arc<dyn Browser>> {
        match &*self.browser.lock() {
            Some(browser) if !browser.is_closed() => Ok(browser.clone()),
            Some(_) => Err(StorefrontError::misuse(
                "scenario started after the shared browser was closed",
            )),
            None if self.dry_run => {
                Err(StorefrontError::misuse("no browser was launched for this run"))
            }
            None => Err(StorefrontError::misuse(
                "scenario started after the shared browser was released",
            )),
        }
    }

    /// Hands the browser to the run-end hook; later calls get `None`.
    pub(crate) fn take_browser(&self) -> Option<Arc<dyn Browser>> {
        self.browser.lock().take()
    }

    /// 1 for the first run of `scenario`, 2 for its first retry, ...
    pub fn next_attempt(&self, scenario: &str) -> usize {
        let mut attempt = self.attempts.entry(scenario.to_string()).or_insert(0);
        *attempt += 1;
        *attempt
    }

    /// Makes `state` the current run, replacing any previous one.
    pub fn install(state: RunState) -> Arc<RunState> {
        let state = Arc::new(state);
        if CURRENT.write().replace(state.clone()).is_some() {
            debug!("Replaced a previous run state");
        }
        state
    }

    pub fn current() -> Result<Arc<RunState>> {
        CURRENT
            .read()
            .clone()
            .ok_or_else(|| StorefrontError::misuse("scenario hook ran outside of a run"))
    }

    pub fn take() -> Option<Arc<RunState>> {
        CURRENT.write().take()
    }
}
