//! Console and page error capture.
//!
//! Backends push into a [`Diagnostics`] from their event listeners; the
//! scenario reads it when a scenario fails. Clones share one buffer.

use parking_lot::Mutex;
use std::sync::Arc;

/// Prefix for uncaught page errors, distinguishing them from console errors.
pub const PAGE_ERROR_PREFIX: &str = "Page error: ";

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `console.error` message verbatim.
    pub fn record_console_error(&self, text: impl Into<String>) {
        self.messages.lock().push(text.into());
    }

    /// Records an uncaught exception from the page.
    pub fn record_page_error(&self, text: impl AsRef<str>) {
        self.messages
            .lock()
            .push(format!("{PAGE_ERROR_PREFIX}{}", text.as_ref()));
    }

    /// Snapshot in arrival order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_buffer() {
        let diagnostics = Diagnostics::new();
        let listener = diagnostics.clone();

        listener.record_console_error("Failed to load resource");
        listener.record_page_error("x is not defined");

        assert_eq!(
            diagnostics.messages(),
            vec![
                "Failed to load resource".to_string(),
                "Page error: x is not defined".to_string()
            ]
        );

        diagnostics.clear();
        assert!(listener.is_empty());
    }
}
