//! Workflow execution for PagePilot
//!
//! This crate turns action plans into page interaction:
//! - Step executor composing element resolution, input simulation and settle delays
//! - Workflow runner expanding templates or custom step lists into ordered runs
//! - Template catalog with built-in workflows and YAML extensions
//! - Form filling and function-call argument parsing

pub mod errors;
pub mod executor;
pub mod forms;
mod plan;
pub mod runner;
pub mod templates;
pub mod types;

pub use errors::FlowError;
pub use executor::{DefaultStepExecutor, StepExecutor};
pub use forms::FormFiller;
pub use runner::{NavigationOutcome, WorkflowRunner};
pub use templates::{TemplateCatalog, WorkflowTemplate};
pub use types::*;
