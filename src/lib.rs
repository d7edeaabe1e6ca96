//! PagePilot library
//!
//! Facade over the workspace crates: configuration, the [`Engine`] that runs workflows, fills
//! forms and captures snapshots, and the error type they share.

pub mod config;
pub mod engine;
pub mod errors;

pub use config::PilotConfig;
pub use engine::Engine;
pub use errors::PilotError;

pub use action_flow::{
    ActionPlan, ActionStep, ExecutionReport, FormFillReport, FormFillRequest, NavigationOutcome,
    StepOutcome, StepStatus, TemplateCatalog,
};
pub use action_locator::LocatorHint;
pub use action_primitives::{NavigationTarget, Tempo};
pub use page_adapter::{HtmlPage, PageDocument};
pub use perceiver_structural::{PageSnapshot, SnapshotLimits};
