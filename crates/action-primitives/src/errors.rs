//! Error types for action primitives

use page_adapter::{AdapterError, AdapterErrorKind};
use thiserror::Error;

/// Error types for action primitive operations
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// Element anchor could not be resolved
    #[error("Anchor not found: {0}")]
    AnchorNotFound(String),

    /// Element cannot accept the requested mutation
    #[error("Unsupported element: {0}")]
    UnsupportedElement(String),

    /// Cross-boundary access was refused by the host
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Dropdown option was not found
    #[error("Option not found in dropdown: {0}")]
    OptionNotFound(String),

    /// Payload does not fit the operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Host document error with no closer mapping
    #[error("Adapter error: {0}")]
    Adapter(AdapterError),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::AnchorNotFound(_))
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Internal(_) => 3,
            ActionError::Adapter(_) | ActionError::AccessDenied(_) => 2,
            ActionError::AnchorNotFound(_)
            | ActionError::UnsupportedElement(_)
            | ActionError::OptionNotFound(_) => 1,
            ActionError::InvalidInput(_) => 0,
        }
    }
}

impl From<AdapterError> for ActionError {
    fn from(err: AdapterError) -> Self {
        let detail = err.hint.clone().unwrap_or_else(|| err.kind.to_string());
        match err.kind {
            AdapterErrorKind::NodeNotFound => ActionError::AnchorNotFound(detail),
            AdapterErrorKind::AccessDenied => ActionError::AccessDenied(detail),
            AdapterErrorKind::Unsupported => ActionError::UnsupportedElement(detail),
            AdapterErrorKind::OptionNotFound => ActionError::OptionNotFound(detail),
            AdapterErrorKind::InvalidSelector | AdapterErrorKind::Internal => {
                ActionError::Adapter(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_kinds_map_onto_action_errors() {
        let denied = AdapterError::new(AdapterErrorKind::AccessDenied).with_hint("frame");
        assert!(matches!(
            ActionError::from(denied),
            ActionError::AccessDenied(detail) if detail == "frame"
        ));

        let missing = AdapterError::new(AdapterErrorKind::NodeNotFound);
        assert!(ActionError::from(missing).is_not_found());

        let internal = AdapterError::new(AdapterErrorKind::Internal);
        assert!(matches!(ActionError::from(internal), ActionError::Adapter(_)));
    }
}
