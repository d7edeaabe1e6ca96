//! Element resolution for PagePilot.
//!
//! Turns a [`LocatorHint`] into a single live element through an ordered chain of strategies:
//! - Focused element for the `@active` sentinel
//! - Comma-separated structural selectors
//! - Exact element id, `aria-label` and placeholder substrings
//! - Label text containment and email/password field heuristics
//! - Purpose keywords scanned against clickable elements
//!
//! The first strategy that matches wins. Nothing is scored or ranked.

pub mod errors;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use resolver::*;
pub use strategies::*;
pub use types::*;
