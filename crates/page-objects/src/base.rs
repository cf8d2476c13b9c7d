//! Behaviour every page object shares.

use crate::web_actions::WebActions;
use async_trait::async_trait;
use browser_driver::wait::{self, ElementState, WaitConfig};
use std::path::PathBuf;
use std::time::Duration;
use storefront_core::Result;

/// Default bound for [`BasePage::wait_for_element`].
pub const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// A page object bound to one scenario's page.
///
/// Implementors only provide [`BasePage::actions`]; navigation, element
/// access and URL checks come for free.
#[async_trait]
pub trait BasePage: Send + Sync {
    fn actions(&self) -> &WebActions;

    async fn navigate(&self) -> Result<()> {
        let actions = self.actions();
        actions.navigate_to(actions.base_url()).await
    }

    /// Navigates to `path` relative to the base URL, e.g. `?route=checkout/cart`.
    async fn navigate_to(&self, path: &str) -> Result<()> {
        let actions = self.actions();
        actions.navigate_to(&actions.url_for(path)).await
    }

    async fn wait_for_element(&self, selector: &str) -> Result<()> {
        self.actions()
            .wait_for_state(selector, ElementState::Visible, ELEMENT_TIMEOUT)
            .await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.actions().click(selector).await
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.actions().type_text(selector, text).await
    }

    async fn get_text(&self, selector: &str) -> Result<String> {
        self.actions().get_text(selector).await
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.actions().is_visible(selector).await
    }

    async fn current_url(&self) -> Result<String> {
        self.actions().current_url().await
    }

    async fn title(&self) -> Result<String> {
        self.actions().title().await
    }

    async fn take_screenshot(&self, name: &str) -> Result<Option<PathBuf>> {
        self.actions().take_screenshot(name).await
    }

    async fn wait_for_page_load(&self) -> Result<()> {
        self.actions().wait_for_load().await
    }

    /// Waits for the URL to contain `part`, then reports whether it does.
    async fn verify_url_contains(&self, part: &str) -> Result<bool> {
        let actions = self.actions();
        let page = actions.page().as_ref();
        let reached = wait::wait_for_result(
            || async move { Ok(page.url().await?.contains(part)) },
            WaitConfig::with_timeout(actions.timeout()),
            part,
        )
        .await;
        match reached {
            Ok(()) => Ok(true),
            Err(browser_driver::BrowserError::WaitTimeout { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn scroll_to_element(&self, selector: &str) -> Result<()> {
        self.actions().scroll_to(selector).await
    }
}
