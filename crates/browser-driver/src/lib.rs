//! # Browser Driver
//!
//! The browser-automation seam of the storefront suite. A [`Browser`] is one
//! shared browser process; each scenario opens its own isolated
//! [`BrowserContext`] (cookies, storage) and a single [`Page`] inside it.
//!
//! Backends:
//! - [`backend::cdp`]: Chromium over the DevTools protocol (chromiumoxide)
//! - [`backend::webdriver`]: Firefox and WebKit over WebDriver (fantoccini)
//! - [`memory`]: scriptable in-memory pages for tests

pub mod backend;
pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod memory;
pub mod wait;

pub use diagnostics::Diagnostics;
pub use error::{BrowserError, Result};
pub use wait::{ElementState, WaitConfig};

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_core::{Config, Engine, Viewport};
use tracing::info;

/// Options for one isolated browsing context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOptions {
    pub viewport: Viewport,
    pub accept_downloads: bool,
    /// Where to record video, for backends that can.
    pub record_video_dir: Option<PathBuf>,
}

impl ContextOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            viewport: config.viewport,
            accept_downloads: true,
            record_video_dir: config.media.video.then(|| config.videos_dir()),
        }
    }
}

/// A running browser process shared by every scenario of a run.
#[async_trait]
pub trait Browser: Send + Sync + std::fmt::Debug {
    fn engine(&self) -> Engine;

    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn BrowserContext>>;

    async fn close(&self) -> Result<()>;

    fn is_closed(&self) -> bool;
}

/// An isolated browsing session nested in a [`Browser`].
#[async_trait]
pub trait BrowserContext: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;

    async fn new_page(&self) -> Result<Arc<dyn Page>>;

    /// Closes every page of the context and discards its state.
    async fn close(&self) -> Result<()>;
}

/// One browser tab.
///
/// Script-capable backends implement [`Page::evaluate`] and inherit the DOM
/// queries below, which are expressed as scripts from [`dom`].
#[async_trait]
pub trait Page: Send + Sync + std::fmt::Debug {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// PNG bytes of the viewport, or of the whole document.
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>>;

    async fn clear_cookies(&self) -> Result<()>;

    async fn close(&self) -> Result<()>;

    fn is_closed(&self) -> bool;

    fn diagnostics(&self) -> &Diagnostics;

    /// Pulls buffered errors out of the page, for backends that poll.
    async fn collect_diagnostics(&self) -> Result<()> {
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        string_result(self.evaluate(dom::LOCATION).await?)
    }

    async fn title(&self) -> Result<String> {
        string_result(self.evaluate(dom::TITLE).await?)
    }

    async fn ready_state(&self) -> Result<String> {
        string_result(self.evaluate(dom::READY_STATE).await?)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let value = self.evaluate(&dom::count(selector)?).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn is_visible(&self, selector: &str, index: usize) -> Result<bool> {
        let value = self.evaluate(&dom::is_visible(selector, index)?).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let value = self.evaluate(&dom::texts(selector)?).await?;
        serde_json::from_value(value).map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    async fn value(&self, selector: &str, index: usize) -> Result<String> {
        let result = self.evaluate(&dom::value(selector, index)?).await?;
        string_result(dom::element_result(selector, index, result)?)
    }

    async fn click(&self, selector: &str, index: usize) -> Result<()> {
        let result = self.evaluate(&dom::click(selector, index)?).await?;
        dom::element_result(selector, index, result).map(|_| ())
    }

    async fn fill(&self, selector: &str, index: usize, text: &str) -> Result<()> {
        let result = self.evaluate(&dom::fill(selector, index, text)?).await?;
        dom::element_result(selector, index, result).map(|_| ())
    }

    async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        let result = self.evaluate(&dom::select_option(selector, label)?).await?;
        match dom::element_result(selector, 0, result)? {
            Value::Bool(true) => Ok(()),
            _ => Err(BrowserError::OptionNotFound {
                selector: selector.to_string(),
                label: label.to_string(),
            }),
        }
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<()> {
        let result = self.evaluate(&dom::set_checked(selector, checked)?).await?;
        dom::element_result(selector, 0, result).map(|_| ())
    }

    async fn scroll_into_view(&self, selector: &str, index: usize) -> Result<()> {
        let result = self.evaluate(&dom::scroll_into_view(selector, index)?).await?;
        dom::element_result(selector, index, result).map(|_| ())
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<()> {
        self.evaluate(&dom::set_cookie(name, value)?).await.map(|_| ())
    }
}

fn string_result(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// Launches the process-wide browser for the configured engine.
pub async fn launch(config: &Config) -> Result<Arc<dyn Browser>> {
    info!(
        "Launching {} (headless: {}, timeout: {:?})",
        config.engine, config.headless, config.timeout
    );
    let browser: Arc<dyn Browser> = match config.engine {
        Engine::Chromium => Arc::new(backend::cdp::CdpBrowser::launch(config).await?),
        Engine::Firefox | Engine::Webkit => {
            Arc::new(backend::webdriver::WebDriverBrowser::connect(config).await?)
        }
    };
    Ok(browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_options_follow_media_config() {
        let mut config = Config::default();
        let options = ContextOptions::from_config(&config);
        assert_eq!(options.viewport, Viewport { width: 1280, height: 720 });
        assert!(options.accept_downloads);
        assert!(options.record_video_dir.is_none());

        config.media.video = true;
        let options = ContextOptions::from_config(&config);
        assert_eq!(options.record_video_dir, Some(config.videos_dir()));
    }

    #[test]
    fn non_string_results_are_stringified() {
        assert_eq!(string_result(Value::from("a")).unwrap(), "a");
        assert_eq!(string_result(Value::Null).unwrap(), "");
        assert_eq!(string_result(Value::from(3)).unwrap(), "3");
    }
}
