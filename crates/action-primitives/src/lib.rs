//! Action primitives for PagePilot
//!
//! This crate provides the low-level operations the step executor composes:
//! - An input simulator that dispatches on element capability and emits framework events
//! - A click primitive with a fixed settle wait
//! - Navigation target construction
//! - Shared settle timing and error handling

pub mod errors;
mod primitives;
pub mod types;
mod waiting;

pub use errors::*;
pub use primitives::*;
pub use types::*;
pub use waiting::*;
