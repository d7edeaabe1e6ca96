//! Error types for locator system

use page_adapter::AdapterError;
use thiserror::Error;

/// Locator error enumeration
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Element not found with any strategy
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Hint could not be parsed
    #[error("Invalid locator hint: {0}")]
    InvalidHint(String),

    /// Strategy execution failed
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },

    /// Host document error
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

impl LocatorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LocatorError::ElementNotFound(_))
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::Adapter(_) => 2,
            LocatorError::ElementNotFound(_) | LocatorError::StrategyFailed { .. } => 1,
            LocatorError::InvalidHint(_) => 0,
        }
    }
}
