//! Firefox and WebKit over WebDriver.
//!
//! The WebDriver server (geckodriver, safaridriver, ...) is the shared
//! process; every context is a fresh session on it, which gives the same
//! cookie and storage isolation a CDP browser context does.

use crate::diagnostics::Diagnostics;
use crate::dom;
use crate::error::{BrowserError, Result};
use crate::{Browser, BrowserContext, ContextOptions, Page};
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{Config, Engine};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct WebDriverBrowser {
    engine: Engine,
    webdriver_url: String,
    capabilities: Capabilities,
    timeout: Duration,
    closed: AtomicBool,
}

impl WebDriverBrowser {
    /// Checks the WebDriver endpoint by opening and closing one session.
    pub async fn connect(config: &Config) -> Result<Self> {
        let browser = Self {
            engine: config.engine,
            webdriver_url: config.webdriver_url.clone(),
            capabilities: capabilities(config.engine, config.headless),
            timeout: config.timeout,
            closed: AtomicBool::new(false),
        };

        let probe = browser
            .session()
            .await
            .map_err(|e| BrowserError::LaunchFailed {
                reason: format!(
                    "no {} WebDriver session at {}",
                    browser.engine, browser.webdriver_url
                ),
                source: Some(Box::new(e)),
            })?;
        probe.close().await?;

        debug!("WebDriver endpoint {} is ready", browser.webdriver_url);
        Ok(browser)
    }

    async fn session(&self) -> Result<Client> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities.clone())
            .connect(&self.webdriver_url)
            .await?;
        Ok(client)
    }
}

fn capabilities(engine: Engine, headless: bool) -> Capabilities {
    let mut caps = Capabilities::new();
    match engine {
        Engine::Firefox => {
            caps.insert("browserName".to_string(), json!("firefox"));
            let args: Vec<&str> = if headless { vec!["-headless"] } else { vec![] };
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
        Engine::Webkit => {
            caps.insert("browserName".to_string(), json!("safari"));
            if headless {
                warn!("WebKit has no headless mode over WebDriver; running headed");
            }
        }
        Engine::Chromium => {
            caps.insert("browserName".to_string(), json!("chrome"));
            let args: Vec<&str> = if headless { vec!["--headless"] } else { vec![] };
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
    }
    caps
}

#[async_trait]
impl Browser for WebDriverBrowser {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn BrowserContext>> {
        if self.is_closed() {
            return Err(BrowserError::AlreadyClosed);
        }

        let client = self.session().await?;
        client
            .set_window_size(options.viewport.width, options.viewport.height)
            .await?;

        if let Some(dir) = &options.record_video_dir {
            warn!(
                "Video recording is not available over WebDriver; nothing will be written to {}",
                dir.display()
            );
        }

        Ok(Box::new(WebDriverContext {
            id: uuid::Uuid::new_v4().to_string(),
            client,
            timeout: self.timeout,
            pages: parking_lot::Mutex::new(Vec::new()),
        }))
    }

    async fn close(&self) -> Result<()> {
        // Sessions are owned and closed by their contexts.
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct WebDriverContext {
    id: String,
    client: Client,
    timeout: Duration,
    pages: parking_lot::Mutex<Vec<Arc<WebDriverPage>>>,
}

#[async_trait]
impl BrowserContext for WebDriverContext {
    fn id(&self) -> &str {
        &self.id
    }

    /// A session has one top-level window; pages share it.
    async fn new_page(&self) -> Result<Arc<dyn Page>> {
        let page = Arc::new(WebDriverPage {
            client: self.client.clone(),
            diagnostics: Diagnostics::new(),
            closed: AtomicBool::new(false),
            timeout: self.timeout,
        });
        self.pages.lock().push(page.clone());
        Ok(page)
    }

    async fn close(&self) -> Result<()> {
        let pages: Vec<Arc<WebDriverPage>> = self.pages.lock().drain(..).collect();
        for page in pages {
            page.closed.store(true, Ordering::SeqCst);
        }
        self.client.clone().close().await?;
        debug!("Closed WebDriver session for context {}", self.id);
        Ok(())
    }
}

#[derive(Debug)]
pub struct WebDriverPage {
    client: Client,
    diagnostics: Diagnostics,
    closed: AtomicBool,
    timeout: Duration,
}

impl WebDriverPage {
    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(BrowserError::AlreadyClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        match tokio::time::timeout(self.timeout, self.client.goto(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(BrowserError::NavigationFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(BrowserError::NavigationFailed {
                    url: url.to_string(),
                    reason: format!("timed out after {:?}", self.timeout),
                })
            }
        }

        // Errors raised before the hooks land are not captured.
        if let Err(e) = self.evaluate(dom::INSTALL_ERROR_HOOKS).await {
            debug!("Could not install error hooks on {}: {}", url, e);
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.ensure_open()?;
        let value = self
            .client
            .execute(&format!("return {script};"), Vec::new())
            .await?;
        Ok(value)
    }

    async fn url(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.client.current_url().await?.to_string())
    }

    async fn title(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.client.title().await?)
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        self.ensure_open()?;
        if full_page {
            debug!("WebDriver screenshots cover the viewport only");
        }
        Ok(self.client.screenshot().await?)
    }

    async fn clear_cookies(&self) -> Result<()> {
        self.ensure_open()?;
        self.client.delete_all_cookies().await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    async fn collect_diagnostics(&self) -> Result<()> {
        let drained = self.evaluate(dom::DRAIN_ERRORS).await?;
        record_drained(&self.diagnostics, &drained);
        Ok(())
    }
}

fn record_drained(diagnostics: &Diagnostics, drained: &Value) {
    for entry in drained.as_array().into_iter().flatten() {
        let text = entry.get("text").and_then(Value::as_str).unwrap_or_default();
        match entry.get("kind").and_then(Value::as_str) {
            Some("page") => diagnostics.record_page_error(text),
            _ => diagnostics.record_console_error(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firefox_capabilities_carry_headless_flag() {
        let caps = capabilities(Engine::Firefox, true);
        assert_eq!(caps["browserName"], json!("firefox"));
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));

        let caps = capabilities(Engine::Firefox, false);
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!([]));
    }

    #[test]
    fn webkit_maps_to_safari() {
        let caps = capabilities(Engine::Webkit, false);
        assert_eq!(caps["browserName"], json!("safari"));
    }

    #[test]
    fn drained_errors_keep_their_kind() {
        let diagnostics = Diagnostics::new();
        record_drained(
            &diagnostics,
            &json!([
                { "kind": "console", "text": "404 on /image.png" },
                { "kind": "page", "text": "Uncaught TypeError" }
            ]),
        );
        assert_eq!(
            diagnostics.messages(),
            vec![
                "404 on /image.png".to_string(),
                "Page error: Uncaught TypeError".to_string()
            ]
        );
    }
}
