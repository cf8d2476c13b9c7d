//! In-memory browser backend.
//!
//! Pages hold a fixed selector-to-elements map instead of a DOM. Actions are
//! logged so tests can assert on what a page object did, and the browser
//! counts contexts so lifecycle tests can check that every context opened
//! was also closed.

use crate::diagnostics::Diagnostics;
use crate::error::{BrowserError, Result};
use crate::{dom, Browser, BrowserContext, ContextOptions, Page};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use storefront_core::Engine;

/// PNG file signature, returned as screenshot bytes.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    pub text: String,
    pub value: String,
    pub visible: bool,
    pub checked: bool,
    /// Option labels, for `<select>` elements.
    pub options: Vec<String>,
}

impl MemoryElement {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            ..Default::default()
        }
    }

    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            visible: true,
            ..Default::default()
        }
    }

    pub fn select(options: &[&str]) -> Self {
        Self {
            visible: true,
            options: options.iter().map(|o| o.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// The content every new page starts from.
#[derive(Debug, Clone, Default)]
pub struct MemorySite {
    title: String,
    elements: HashMap<String, Vec<MemoryElement>>,
    click_navigations: HashMap<String, String>,
}

impl MemorySite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn element(mut self, selector: impl Into<String>, element: MemoryElement) -> Self {
        self.elements
            .entry(selector.into())
            .or_default()
            .push(element);
        self
    }

    pub fn elements(
        mut self,
        selector: impl Into<String>,
        elements: impl IntoIterator<Item = MemoryElement>,
    ) -> Self {
        self.elements
            .entry(selector.into())
            .or_default()
            .extend(elements);
        self
    }

    /// Clicking `selector` moves the page to `url`.
    pub fn navigate_on_click(mut self, selector: impl Into<String>, url: impl Into<String>) -> Self {
        self.click_navigations.insert(selector.into(), url.into());
        self
    }
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    site: MemorySite,
    cookies: BTreeMap<String, String>,
    actions: Vec<String>,
    screenshots: usize,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
    diagnostics: Diagnostics,
    closed: AtomicBool,
    fail_screenshots: AtomicBool,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::from_site(MemorySite::default())
    }

    pub fn from_site(site: MemorySite) -> Self {
        Self {
            state: Mutex::new(PageState {
                url: "about:blank".to_string(),
                site,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn set_elements(&self, selector: &str, elements: Vec<MemoryElement>) {
        self.state
            .lock()
            .site
            .elements
            .insert(selector.to_string(), elements);
    }

    pub fn elements(&self, selector: &str) -> Vec<MemoryElement> {
        self.state
            .lock()
            .site
            .elements
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    /// Every action taken, e.g. `goto https://...`, `click #button-cart[0]`.
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.state.lock().cookies.clone()
    }

    pub fn screenshots_taken(&self) -> usize {
        self.state.lock().screenshots
    }

    pub fn fail_screenshots(&self, fail: bool) {
        self.fail_screenshots.store(fail, Ordering::SeqCst);
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(BrowserError::AlreadyClosed);
        }
        Ok(())
    }

    fn record(&self, action: String) {
        self.state.lock().actions.push(action);
    }

    /// Applies `f` to the `index`-th match of `selector`.
    fn with_element<T>(
        &self,
        selector: &str,
        index: usize,
        f: impl FnOnce(&mut MemoryElement) -> T,
    ) -> Result<T> {
        self.ensure_open()?;
        let mut state = self.state.lock();
        let elements = state.site.elements.entry(selector.to_string()).or_default();
        let len = elements.len();
        match elements.get_mut(index) {
            Some(element) => Ok(f(element)),
            None => Err(BrowserError::ElementIndex {
                selector: selector.to_string(),
                index,
                len,
            }),
        }
    }
}

#[async_trait]
impl Page for MemoryPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state.lock();
        state.url = url.to_string();
        state.actions.push(format!("goto {url}"));
        Ok(())
    }

    /// Answers the location, title and ready-state probes; anything else
    /// evaluates to `null`.
    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.ensure_open()?;
        let state = self.state.lock();
        Ok(match script {
            dom::LOCATION => Value::from(state.url.clone()),
            dom::TITLE => Value::from(state.site.title.clone()),
            dom::READY_STATE => Value::from("complete"),
            _ => Value::Null,
        })
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        self.ensure_open()?;
        if self.fail_screenshots.load(Ordering::SeqCst) {
            return Err(BrowserError::ScriptExecutionFailed(
                "screenshot capture failed".to_string(),
            ));
        }
        let mut state = self.state.lock();
        state.screenshots += 1;
        state.actions.push(format!("screenshot full_page={full_page}"));
        Ok(PNG_SIGNATURE.to_vec())
    }

    async fn clear_cookies(&self) -> Result<()> {
        self.ensure_open()?;
        self.state.lock().cookies.clear();
        self.record("clear_cookies".to_string());
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

    async fn count(&self, selector: &str) -> Result<usize> {
        self.ensure_open()?;
        Ok(self
            .state
            .lock()
            .site
            .elements
            .get(selector)
            .map_or(0, Vec::len))
    }

    async fn is_visible(&self, selector: &str, index: usize) -> Result<bool> {
        self.ensure_open()?;
        Ok(self
            .state
            .lock()
            .site
            .elements
            .get(selector)
            .and_then(|elements| elements.get(index))
            .is_some_and(|element| element.visible))
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self
            .elements(selector)
            .into_iter()
            .map(|element| element.text.trim().to_string())
            .collect())
    }

    async fn value(&self, selector: &str, index: usize) -> Result<String> {
        self.with_element(selector, index, |element| element.value.clone())
    }

    async fn click(&self, selector: &str, index: usize) -> Result<()> {
        self.with_element(selector, index, |_| ())?;
        let mut state = self.state.lock();
        state.actions.push(format!("click {selector}[{index}]"));
        if let Some(url) = state.site.click_navigations.get(selector).cloned() {
            state.actions.push(format!("goto {url}"));
            state.url = url;
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, index: usize, text: &str) -> Result<()> {
        self.with_element(selector, index, |element| element.value = text.to_string())?;
        self.record(format!("fill {selector}[{index}]={text}"));
        Ok(())
    }

    async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        let found = self.with_element(selector, 0, |element| {
            let found = element.options.iter().any(|o| o == label);
            if found {
                element.value = label.to_string();
            }
            found
        })?;
        if !found {
            return Err(BrowserError::OptionNotFound {
                selector: selector.to_string(),
                label: label.to_string(),
            });
        }
        self.record(format!("select {selector}={label}"));
        Ok(())
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<()> {
        self.with_element(selector, 0, |element| element.checked = checked)?;
        self.record(format!("check {selector}={checked}"));
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str, index: usize) -> Result<()> {
        self.with_element(selector, index, |_| ())
    }

    async fn set_cookie(&self, name: &str, value: &str) -> Result<()> {
        self.ensure_open()?;
        self.state
            .lock()
            .cookies
            .insert(name.to_string(), value.to_string());
        self.record(format!("cookie {name}={value}"));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct BrowserState {
    site: RwLock<MemorySite>,
    pages: Mutex<Vec<Arc<MemoryPage>>>,
    last_options: Mutex<Option<ContextOptions>>,
    contexts_opened: AtomicUsize,
    contexts_closed: AtomicUsize,
    closed: AtomicBool,
    fail_screenshots: AtomicBool,
    fail_context_close: AtomicBool,
}

/// Cloning shares state, so a test can keep a handle to the browser it gave
/// away.
#[derive(Debug, Clone, Default)]
pub struct MemoryBrowser {
    state: Arc<BrowserState>,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(site: MemorySite) -> Self {
        let browser = Self::default();
        *browser.state.site.write() = site;
        browser
    }

    pub fn contexts_opened(&self) -> usize {
        self.state.contexts_opened.load(Ordering::SeqCst)
    }

    pub fn contexts_closed(&self) -> usize {
        self.state.contexts_closed.load(Ordering::SeqCst)
    }

    pub fn open_contexts(&self) -> usize {
        self.contexts_opened() - self.contexts_closed()
    }

    pub fn pages(&self) -> Vec<Arc<MemoryPage>> {
        self.state.pages.lock().clone()
    }

    pub fn last_page(&self) -> Option<Arc<MemoryPage>> {
        self.state.pages.lock().last().cloned()
    }

    pub fn last_context_options(&self) -> Option<ContextOptions> {
        self.state.last_options.lock().clone()
    }

    /// Makes every page created from now on fail its screenshots.
    pub fn fail_screenshots(&self, fail: bool) {
        self.state.fail_screenshots.store(fail, Ordering::SeqCst);
    }

    /// Makes context close fail, as a leaked session would.
    pub fn fail_context_close(&self, fail: bool) {
        self.state.fail_context_close.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Browser for MemoryBrowser {
    fn engine(&self) -> Engine {
        Engine::Chromium
    }

    async fn new_context(&self, options: &ContextOptions) -> Result<Box<dyn BrowserContext>> {
        if self.is_closed() {
            return Err(BrowserError::AlreadyClosed);
        }
        let number = self.state.contexts_opened.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.last_options.lock() = Some(options.clone());
        Ok(Box::new(MemoryContext {
            id: format!("memory-context-{number}"),
            browser: self.state.clone(),
            pages: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }))
    }

    async fn close(&self) -> Result<()> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MemoryContext {
    id: String,
    browser: Arc<BrowserState>,
    pages: Mutex<Vec<Arc<MemoryPage>>>,
    closed: AtomicBool,
}

#[async_trait]
impl BrowserContext for MemoryContext {
    fn id(&self) -> &str {
        &self.id
    }

    async fn new_page(&self) -> Result<Arc<dyn Page>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrowserError::AlreadyClosed);
        }
        let page = Arc::new(MemoryPage::from_site(self.browser.site.read().clone()));
        page.fail_screenshots(self.browser.fail_screenshots.load(Ordering::SeqCst));
        self.pages.lock().push(page.clone());
        self.browser.pages.lock().push(page.clone());
        Ok(page)
    }

    async fn close(&self) -> Result<()> {
        if self.browser.fail_context_close.load(Ordering::SeqCst) {
            return Err(BrowserError::ConnectionFailed(format!(
                "context {} refused to close",
                self.id
            )));
        }
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let pages: Vec<Arc<MemoryPage>> = self.pages.lock().drain(..).collect();
        for page in pages {
            page.close().await?;
        }
        self.browser.contexts_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Viewport;

    fn options() -> ContextOptions {
        ContextOptions {
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            accept_downloads: true,
            record_video_dir: None,
        }
    }

    #[tokio::test]
    async fn pages_start_from_the_site_and_log_actions() {
        let site = MemorySite::new()
            .title("Your Store")
            .element("#input-email", MemoryElement::input(""))
            .element("#submit", MemoryElement::text("Login"))
            .elements(".product-layout", [MemoryElement::text("iPhone"), MemoryElement::text("iPod")])
            .navigate_on_click("#submit", "https://shop/?route=account/account");
        let browser = MemoryBrowser::with_site(site);

        let context = browser.new_context(&options()).await.unwrap();
        let page = context.new_page().await.unwrap();

        page.goto("https://shop/").await.unwrap();
        assert_eq!(page.title().await.unwrap(), "Your Store");
        assert_eq!(page.count(".product-layout").await.unwrap(), 2);
        assert_eq!(page.texts(".product-layout").await.unwrap(), vec!["iPhone", "iPod"]);

        page.fill("#input-email", 0, "a@b.c").await.unwrap();
        assert_eq!(page.value("#input-email", 0).await.unwrap(), "a@b.c");

        page.click("#submit", 0).await.unwrap();
        assert!(page.url().await.unwrap().contains("account/account"));

        let memory_page = browser.last_page().unwrap();
        assert_eq!(
            memory_page.actions(),
            vec![
                "goto https://shop/",
                "fill #input-email[0]=a@b.c",
                "click #submit[0]",
                "goto https://shop/?route=account/account",
            ]
        );
    }

    #[tokio::test]
    async fn missing_elements_and_options_are_reported() {
        let page = MemoryPage::new();
        page.set_elements("#input-sort", vec![MemoryElement::select(&["Default", "Price (Low > High)"])]);

        let err = page.click(".product-layout", 3).await.unwrap_err();
        assert!(matches!(err, BrowserError::ElementIndex { index: 3, len: 0, .. }));

        page.select_option("#input-sort", "Price (Low > High)").await.unwrap();
        let err = page.select_option("#input-sort", "Rating").await.unwrap_err();
        assert!(matches!(err, BrowserError::OptionNotFound { .. }));
    }

    #[tokio::test]
    async fn contexts_are_counted_and_close_their_pages() {
        let browser = MemoryBrowser::new();
        let context = browser.new_context(&options()).await.unwrap();
        let page = context.new_page().await.unwrap();
        assert_eq!(browser.open_contexts(), 1);

        context.close().await.unwrap();
        context.close().await.unwrap();
        assert_eq!(browser.contexts_closed(), 1);
        assert!(page.is_closed());
        assert!(matches!(page.goto("x").await, Err(BrowserError::AlreadyClosed)));
    }

    #[tokio::test]
    async fn failure_switches_apply() {
        let browser = MemoryBrowser::new();
        browser.fail_screenshots(true);
        browser.fail_context_close(true);

        let context = browser.new_context(&options()).await.unwrap();
        let page = context.new_page().await.unwrap();
        assert!(page.screenshot(true).await.is_err());
        assert!(context.close().await.is_err());
        assert_eq!(browser.open_contexts(), 1);
    }
}
