//! Error types for browser automation.
//!
//! Each variant keeps the context needed to explain the failure in a scenario
//! report: which selector, which URL, how long we waited.

use std::time::Duration;
use storefront_core::StorefrontError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// The browser process or WebDriver session could not be started.
    #[error("failed to launch browser: {reason}")]
    LaunchFailed {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("browser connection failed: {0}")]
    ConnectionFailed(String),

    #[error("navigation to '{url}' failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    /// A page-level condition (document ready, custom predicate) never held.
    #[error("wait condition '{condition}' timed out after {timeout:?}")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
    },

    /// A selector never reached the wanted state.
    #[error("element '{selector}' not {state} within {timeout:?}")]
    ElementTimeout {
        selector: String,
        state: String,
        timeout: Duration,
    },

    #[error("element '{selector}' has no match at index {index} ({len} found)")]
    ElementIndex {
        selector: String,
        index: usize,
        len: usize,
    },

    #[error("select '{selector}' has no option '{label}'")]
    OptionNotFound { selector: String, label: String },

    #[error("JavaScript execution failed: {0}")]
    ScriptExecutionFailed(String),

    #[error("browser instance is already closed")]
    AlreadyClosed,

    #[error("chromiumoxide error: {0}")]
    ChromiumOxide(#[from] chromiumoxide::error::CdpError),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session could not be created: {0}")]
    WebDriverSession(#[from] fantoccini::error::NewSessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BrowserError>;

impl From<BrowserError> for StorefrontError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::ElementTimeout {
                selector,
                state,
                timeout,
            } => StorefrontError::ElementNotFound {
                selector,
                state,
                timeout,
            },
            BrowserError::ElementIndex {
                selector,
                index,
                len,
            } => StorefrontError::IndexOutOfRange {
                what: selector,
                index,
                len,
            },
            BrowserError::OptionNotFound { selector, label } => StorefrontError::assertion(
                format!("option '{label}' in '{selector}'"),
                "no such option",
            ),
            BrowserError::AlreadyClosed => {
                StorefrontError::misuse("browser page used after it was closed")
            }
            other => StorefrontError::Driver {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_timeouts_become_element_not_found() {
        let err: StorefrontError = BrowserError::ElementTimeout {
            selector: "#button-cart".to_string(),
            state: "visible".to_string(),
            timeout: Duration::from_secs(5),
        }
        .into();
        assert!(matches!(err, StorefrontError::ElementNotFound { ref selector, .. } if selector == "#button-cart"));
    }

    #[test]
    fn closed_browser_is_misuse() {
        let err: StorefrontError = BrowserError::AlreadyClosed.into();
        assert!(err.is_misuse());

        let err: StorefrontError = BrowserError::ScriptExecutionFailed("boom".into()).into();
        assert!(matches!(err, StorefrontError::Driver { .. }));
    }
}
