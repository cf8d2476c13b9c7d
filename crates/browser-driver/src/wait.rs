//! Wait conditions for browser operations.
//!
//! Every wait polls a condition at a fixed interval until it holds or the
//! configured timeout elapses. Nothing here blocks longer than its timeout.

use crate::error::{BrowserError, Result};
use crate::Page;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default timeout for wait operations (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default poll interval for checking conditions (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL.min(timeout))
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// States an element can be waited into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Present in the DOM, visible or not.
    Attached,
    Visible,
    /// Absent or not rendered.
    Hidden,
}

impl ElementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementState::Attached => "attached",
            ElementState::Visible => "visible",
            ElementState::Hidden => "hidden",
        }
    }
}

/// Polls `condition` until it returns true.
pub async fn wait_for<F, Fut>(condition: F, config: WaitConfig, description: &str) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();

    loop {
        if condition().await {
            return Ok(());
        }

        if start.elapsed() >= config.timeout {
            return Err(BrowserError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        sleep(config.poll_interval).await;
    }
}

/// Like [`wait_for`], but errors from the condition count as "not yet".
///
/// A page mid-navigation rejects scripts for a moment; that is not a failure.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    wait_for(
        || {
            let fut = condition();
            async move { matches!(fut.await, Ok(true)) }
        },
        config,
        description,
    )
    .await
}

/// Waits until the `index`-th match of `selector` reaches `state`.
///
/// A closed page fails immediately rather than burning the whole timeout.
pub async fn wait_for_element(
    page: &dyn Page,
    selector: &str,
    index: usize,
    state: ElementState,
    config: WaitConfig,
) -> Result<()> {
    let start = Instant::now();

    loop {
        if page.is_closed() {
            return Err(BrowserError::AlreadyClosed);
        }

        let reached = match state {
            ElementState::Attached => page.count(selector).await.map(|n| n > index),
            ElementState::Visible => page.is_visible(selector, index).await,
            ElementState::Hidden => page.is_visible(selector, index).await.map(|v| !v),
        };
        if let Ok(true) = reached {
            return Ok(());
        }

        if start.elapsed() >= config.timeout {
            return Err(BrowserError::ElementTimeout {
                selector: selector.to_string(),
                state: state.as_str().to_string(),
                timeout: config.timeout,
            });
        }

        sleep(config.poll_interval).await;
    }
}

/// Waits for `document.readyState` to become `complete`.
pub async fn wait_for_load(page: &dyn Page, config: WaitConfig) -> Result<()> {
    wait_for_result(
        || async move { Ok(page.ready_state().await? == "complete") },
        config,
        "document ready",
    )
    .await
}
