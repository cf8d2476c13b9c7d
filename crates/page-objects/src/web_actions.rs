//! Reusable element interactions shared by every page object.
//!
//! Each action waits for its element to become visible before touching it,
//! honours the configured slow-motion delay, and reports failures as
//! [`StorefrontError`] so step handlers can propagate them with `?`.

use browser_driver::wait::{self, ElementState, WaitConfig};
use browser_driver::{BrowserError, Page};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::constants::time;
use storefront_core::{artifacts, Config, Result, StorefrontError};
use tokio::time::sleep;
use tracing::{debug, info};

/// How long a visibility probe waits before answering `false`.
pub const VISIBILITY_PROBE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct WebActions {
    page: Arc<dyn Page>,
    base_url: String,
    timeout: Duration,
    slow_mo: Duration,
    settle: Duration,
    /// Set when ad-hoc screenshots are enabled.
    screenshots_dir: Option<PathBuf>,
}

impl WebActions {
    pub fn new(page: Arc<dyn Page>, config: &Config) -> Self {
        Self {
            page,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            slow_mo: config.slow_mo,
            settle: time::XS,
            screenshots_dir: config.media.screenshot.then(|| config.screenshots_dir()),
        }
    }

    /// Overrides the pause used after actions the store answers asynchronously.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn page(&self) -> &Arc<dyn Page> {
        &self.page
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn wait_config(&self, timeout: Duration) -> WaitConfig {
        WaitConfig::with_timeout(timeout)
    }

    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }

    /// Gives the store time to answer an AJAX action (add to cart, update, ...).
    pub async fn settle(&self) {
        if !self.settle.is_zero() {
            sleep(self.settle).await;
        }
    }

    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.pace().await;
        self.page.goto(url).await?;
        self.wait_for_load().await
    }

    pub async fn wait_for_load(&self) -> Result<()> {
        wait::wait_for_load(self.page.as_ref(), self.wait_config(self.timeout)).await?;
        Ok(())
    }

    pub async fn wait_for_state(
        &self,
        selector: &str,
        state: ElementState,
        timeout: Duration,
    ) -> Result<()> {
        wait::wait_for_element(
            self.page.as_ref(),
            selector,
            0,
            state,
            self.wait_config(timeout),
        )
        .await?;
        Ok(())
    }

    pub async fn wait_for_visible(&self, selector: &str) -> Result<()> {
        self.wait_for_state(selector, ElementState::Visible, self.timeout)
            .await
    }

    pub async fn wait_for_hidden(&self, selector: &str) -> Result<()> {
        self.wait_for_state(selector, ElementState::Hidden, self.timeout)
            .await
    }

    pub async fn click(&self, selector: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;
        self.pace().await;
        self.page.click(selector, 0).await?;
        Ok(())
    }

    /// Clicks the `index`-th match, failing with `IndexOutOfRange` when there
    /// are not that many.
    pub async fn click_nth(&self, selector: &str, index: usize, what: &str) -> Result<()> {
        self.ensure_index(selector, index, what).await?;
        self.pace().await;
        self.page.click(selector, index).await?;
        Ok(())
    }

    pub async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;
        self.pace().await;
        self.page.fill(selector, 0, text).await?;
        Ok(())
    }

    pub async fn fill_nth(&self, selector: &str, index: usize, text: &str, what: &str) -> Result<()> {
        self.ensure_index(selector, index, what).await?;
        self.pace().await;
        self.page.fill(selector, index, text).await?;
        Ok(())
    }

    pub async fn get_text(&self, selector: &str) -> Result<String> {
        self.wait_for_visible(selector).await?;
        let texts = self.page.texts(selector).await?;
        Ok(texts.into_iter().next().unwrap_or_default())
    }

    /// Texts of every match, without waiting.
    pub async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self.page.texts(selector).await?)
    }

    pub async fn value_nth(&self, selector: &str, index: usize, what: &str) -> Result<String> {
        self.ensure_index(selector, index, what).await?;
        Ok(self.page.value(selector, index).await?)
    }

    /// Probes for visibility for up to [`VISIBILITY_PROBE`].
    ///
    /// A timeout answers `false`; a closed page is still an error.
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        match self
            .wait_for_state(selector, ElementState::Visible, VISIBILITY_PROBE.min(self.timeout))
            .await
        {
            Ok(()) => Ok(true),
            Err(StorefrontError::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.count(selector).await?)
    }

    pub async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;
        self.pace().await;
        self.page.select_option(selector, label).await?;
        Ok(())
    }

    pub async fn check(&self, selector: &str) -> Result<()> {
        self.wait_for_visible(selector).await?;
        self.pace().await;
        self.page.set_checked(selector, true).await?;
        Ok(())
    }

    pub async fn scroll_to(&self, selector: &str) -> Result<()> {
        self.wait_for_state(selector, ElementState::Attached, self.timeout)
            .await?;
        self.page.scroll_into_view(selector, 0).await?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?)
    }

    pub async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    /// Writes a full-page screenshot to `<reports>/screenshots/<name>.png`.
    ///
    /// Returns `None` without touching the page when screenshots are off.
    pub async fn take_screenshot(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.screenshots_dir else {
            debug!("Screenshots disabled; skipping '{}'", name);
            return Ok(None);
        };
        let bytes = self.page.screenshot(true).await?;
        let path = dir.join(format!("{}.png", artifacts::sanitize_name(name)));
        artifacts::write_file(&path, bytes)?;
        info!("Screenshot saved to {}", path.display());
        Ok(Some(path))
    }

    async fn ensure_index(&self, selector: &str, index: usize, what: &str) -> Result<()> {
        if self.page.is_closed() {
            return Err(BrowserError::AlreadyClosed.into());
        }
        let len = self.page.count(selector).await?;
        if index >= len {
            return Err(StorefrontError::IndexOutOfRange {
                what: what.to_string(),
                index,
                len,
            });
        }
        Ok(())
    }
}
