//! Workflow execution error types

use thiserror::Error;

/// Workflow execution errors
///
/// Step-level failures never surface here; they become `StepOutcome` data.
#[derive(Debug, Error, Clone)]
pub enum FlowError {
    /// Template name has no definition and no custom steps were supplied
    #[error("Unknown workflow type: {0}")]
    UnknownWorkflow(String),

    /// Plan or step shape is invalid
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Template file has the wrong structure
    #[error("Invalid template structure: {0}")]
    InvalidStructure(String),

    /// Template file could not be read
    #[error("Template I/O error: {0}")]
    TemplateIo(String),

    /// A single action failed outside step reporting, e.g. navigation
    #[error("Step failed: {0}")]
    StepFailed(String),
}

impl From<action_primitives::ActionError> for FlowError {
    fn from(err: action_primitives::ActionError) -> Self {
        FlowError::StepFailed(err.to_string())
    }
}
