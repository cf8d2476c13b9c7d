//! Chromium over the DevTools protocol.
//!
//! One Chrome process per run. Each context is a CDP browser context, so
//! cookies and storage never leak between scenarios even though the process
//! is shared.

use crate::diagnostics::Diagnostics;
use crate::error::{BrowserError, Result};
use crate::{Browser, BrowserContext, ContextOptions, Page};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    BrowserContextId, SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::cdp::js_protocol::runtime::{
    ConsoleApiCalledType, EventConsoleApiCalled, EventExceptionThrown,
};
use chromiumoxide::page::{Page as ChromePage, ScreenshotParams};
use futures::StreamExt;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{Config, Engine};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type SharedBrowser = Arc<Mutex<Option<ChromeBrowser>>>;

#[derive(Debug)]
pub struct CdpBrowser {
    inner: SharedBrowser,
    handler: parking_lot::Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    timeout: Duration,
}

impl CdpBrowser {
    pub async fn launch(config: &Config) -> Result<Self> {
        let browser_config = browser_config(config)?;

        let (browser, mut handler) =
            ChromeBrowser::launch(browser_config)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide only processes CDP events while the handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Chromium launched");

        Ok(Self {
            inner: Arc::new(Mutex::new(Some(browser))),
            handler: parking_lot::Mutex::new(Some(handler_task)),
            closed: AtomicBool::new(false),
            timeout: config.timeout,
        })
    }
}

fn browser_config(config: &Config) -> Result<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .window_size(config.viewport.width, config.viewport.height)
        .request_timeout(config.timeout);

    if !config.headless {
        builder = builder.with_head();
    }

    // A private profile per process; parallel runs otherwise trip Chrome's
    // ProcessSingleton lock.
    let user_data_dir =
        std::env::temp_dir().join(format!("storefront-e2e-{}", uuid::Uuid::new_v4()));
    builder = builder.arg(format!("--user-data-dir={}", user_data_dir.display()));

    for arg in config
        .launch_args
        .iter()
        .map(String::as_str)
        .chain(["--no-sandbox", "--disable-dev-shm-usage"])
    {
        builder = builder.arg(arg);
    }

    if let Some(path) = &config.chrome_path {
        builder = builder.chrome_executable(path.clone());
    }

    builder.build().map_err(|e| BrowserError::LaunchFailed {
        reason: format!("invalid browser configuration: {e}"),
        source: None,
    })
}

#[async_trait]
impl Browser for CdpBrowser {
    fn engine(&self) -> Engine {
        Engine::Chromium
    }

    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn BrowserContext>> {
        let guard = self.inner.lock().await;
        let browser = guard.as_ref().ok_or(BrowserError::AlreadyClosed)?;

        let created = browser
            .execute(CreateBrowserContextParams::default())
            .await?;
        let context_id = created.result.browser_context_id.clone();

        if options.accept_downloads {
            let params = SetDownloadBehaviorParams::builder()
                .behavior(SetDownloadBehaviorBehavior::Allow)
                .browser_context_id(context_id.clone())
                .build()
                .map_err(BrowserError::ConnectionFailed)?;
            if let Err(e) = browser.execute(params).await {
                warn!("Could not enable downloads for context: {}", e);
            }
        }

        if let Some(dir) = &options.record_video_dir {
            warn!(
                "Video recording is not available on Chromium; nothing will be written to {}",
                dir.display()
            );
        }

        debug!("Created browser context {}", context_id.as_ref());

        Ok(Box::new(CdpContext {
            id: context_id.as_ref().to_string(),
            context_id,
            browser: self.inner.clone(),
            options: options.clone(),
            timeout: self.timeout,
            pages: Mutex::new(Vec::new()),
        }))
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.inner.lock().await;

        if let Some(mut browser) = guard.take() {
            debug!("Closing Chromium");
            browser.close().await?;
        }
        let handler = self.handler.lock().take();
        if let Some(handler) = handler {
            handler.abort();
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct CdpContext {
    id: String,
    context_id: BrowserContextId,
    browser: SharedBrowser,
    options: ContextOptions,
    timeout: Duration,
    pages: Mutex<Vec<Arc<CdpPage>>>,
}

#[async_trait]
impl BrowserContext for CdpContext {
    fn id(&self) -> &str {
        &self.id
    }

    async fn new_page(&self) -> Result<Arc<dyn Page>> {
        let chrome_page = {
            let guard = self.browser.lock().await;
            let browser = guard.as_ref().ok_or(BrowserError::AlreadyClosed)?;
            let params = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(self.context_id.clone())
                .build()
                .map_err(BrowserError::ConnectionFailed)?;
            browser.new_page(params).await?
        };

        chrome_page
            .execute(
                SetDeviceMetricsOverrideParams::builder()
                    .width(i64::from(self.options.viewport.width))
                    .height(i64::from(self.options.viewport.height))
                    .device_scale_factor(1.0)
                    .mobile(false)
                    .build()
                    .map_err(BrowserError::ConnectionFailed)?,
            )
            .await?;

        let page = Arc::new(CdpPage::attach(chrome_page, self.timeout).await);
        self.pages.lock().await.push(page.clone());
        Ok(page)
    }

    async fn close(&self) -> Result<()> {
        let pages: Vec<Arc<CdpPage>> = self.pages.lock().await.drain(..).collect();
        for page in pages {
            if let Err(e) = page.close().await {
                debug!("Page close failed during context close: {}", e);
            }
        }

        let guard = self.browser.lock().await;
        match guard.as_ref() {
            Some(browser) => {
                browser
                    .execute(DisposeBrowserContextParams::new(self.context_id.clone()))
                    .await?;
                debug!("Disposed browser context {}", self.id);
            }
            // The process is gone, and every context with it.
            None => debug!("Browser already closed; context {} released", self.id),
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct CdpPage {
    inner: ChromePage,
    diagnostics: Diagnostics,
    listeners: parking_lot::Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
    timeout: Duration,
}

impl CdpPage {
    async fn attach(page: ChromePage, timeout: Duration) -> Self {
        let diagnostics = Diagnostics::new();
        let mut listeners = Vec::new();

        match page.event_listener::<EventConsoleApiCalled>().await {
            Ok(mut events) => {
                let sink = diagnostics.clone();
                listeners.push(tokio::spawn(async move {
                    while let Some(event) = events.next().await {
                        if matches!(event.r#type, ConsoleApiCalledType::Error) {
                            sink.record_console_error(console_text(&event));
                        }
                    }
                }));
            }
            Err(e) => warn!("Console capture unavailable: {}", e),
        }

        match page.event_listener::<EventExceptionThrown>().await {
            Ok(mut events) => {
                let sink = diagnostics.clone();
                listeners.push(tokio::spawn(async move {
                    while let Some(event) = events.next().await {
                        let details = &event.exception_details;
                        let text = details
                            .exception
                            .as_ref()
                            .and_then(|e| e.description.clone())
                            .unwrap_or_else(|| details.text.clone());
                        sink.record_page_error(text);
                    }
                }));
            }
            Err(e) => warn!("Page error capture unavailable: {}", e),
        }

        Self {
            inner: page,
            diagnostics,
            listeners: parking_lot::Mutex::new(listeners),
            closed: AtomicBool::new(false),
            timeout,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(BrowserError::AlreadyClosed);
        }
        Ok(())
    }
}

/// Joins console arguments with spaces; non-string arguments use their
/// description.
fn console_text(event: &EventConsoleApiCalled) -> String {
    event
        .args
        .iter()
        .map(|arg| {
            arg.value
                .as_ref()
                .and_then(|v| v.as_str().map(str::to_string))
                .or_else(|| arg.description.clone())
                .unwrap_or_else(|| "<object>".to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Page for CdpPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        match tokio::time::timeout(self.timeout, self.inner.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: format!("timed out after {:?}", self.timeout),
            }),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.ensure_open()?;
        let result = self
            .inner
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn url(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.inner.url().await?.unwrap_or_default())
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let params = ScreenshotParams::builder().full_page(full_page).build();
        Ok(self.inner.screenshot(params).await?)
    }

    async fn clear_cookies(&self) -> Result<()> {
        self.ensure_open()?;
        self.inner
            .execute(ClearBrowserCookiesParams::default())
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let listeners: Vec<JoinHandle<()>> = self.listeners.lock().drain(..).collect();
        for listener in listeners {
            listener.abort();
        }
        self.inner.clone().close().await?;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn contexts_are_isolated_and_disposable() {
        let config = Config {
            headless: true,
            ..Config::default()
        };
        let browser = CdpBrowser::launch(&config).await.expect("failed to launch");
        let options = ContextOptions::from_config(&config);

        let first = browser.new_context(&options).await.unwrap();
        let second = browser.new_context(&options).await.unwrap();
        assert_ne!(first.id(), second.id());

        let page = first.new_page().await.unwrap();
        page.goto("about:blank").await.unwrap();
        assert_eq!(page.count("body").await.unwrap(), 1);

        first.close().await.unwrap();
        second.close().await.unwrap();
        assert!(page.is_closed());

        browser.close().await.unwrap();
        assert!(browser.is_closed());
    }
}
