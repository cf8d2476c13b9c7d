//! Error types for the storefront suite

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorefrontError>;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("Expectation failed: expected {expectation}, got {actual}")]
    Assertion { expectation: String, actual: String },

    #[error("Element '{selector}' not {state} within {timeout:?}")]
    ElementNotFound {
        selector: String,
        state: String,
        timeout: Duration,
    },

    #[error("{what} index {index} is out of range ({len} available)")]
    IndexOutOfRange {
        what: String,
        index: usize,
        len: usize,
    },

    #[error("Scenario context misuse: {reason}")]
    Misuse { reason: String },

    #[error("Artifact capture failed: {reason}")]
    ArtifactCapture { reason: String },

    #[error("Browser session could not be released: {reason}")]
    ResourceRelease { reason: String },

    #[error("Browser driver failed: {reason}")]
    Driver { reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl StorefrontError {
    pub fn assertion(expectation: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Assertion {
            expectation: expectation.into(),
            actual: actual.into(),
        }
    }

    pub fn misuse(reason: impl Into<String>) -> Self {
        Self::Misuse {
            reason: reason.into(),
        }
    }

    /// Programming errors are never retried or swallowed.
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse { .. })
    }
}

/// Fails with an [`StorefrontError::Assertion`] unless `condition` holds.
pub fn ensure(
    condition: bool,
    expectation: impl Into<String>,
    actual: impl std::fmt::Display,
) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(StorefrontError::assertion(expectation, actual.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_not_found_is_distinct_from_assertion() {
        let err = StorefrontError::ElementNotFound {
            selector: "#cart".to_string(),
            state: "visible".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(!matches!(err, StorefrontError::Assertion { .. }));
        assert!(err.to_string().contains("#cart"));
    }

    #[test]
    fn ensure_reports_expectation_and_actual() {
        assert!(ensure(true, "anything", 0).is_ok());

        let err = ensure(false, "at least 1 result", 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expectation failed: expected at least 1 result, got 0"
        );
        assert!(!err.is_misuse());
    }
}
