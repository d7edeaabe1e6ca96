//! Error handling module

use action_flow::FlowError;
use perceiver_structural::PerceiverError;
use thiserror::Error;

/// Errors surfaced by the engine facade
#[derive(Debug, Error)]
pub enum PilotError {
    /// Plan, template or navigation failure
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Snapshot extraction failure
    #[error(transparent)]
    Perceiver(#[from] PerceiverError),

    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PilotError {
    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
