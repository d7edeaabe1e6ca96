//! PagePilot page adapter.
//!
//! This crate defines the contract every host page must satisfy before the action layers can
//! drive it: a [`PageDocument`] handle that exposes structural queries, a read-only element view
//! and the small set of mutations the input simulator needs. It also ships [`HtmlPage`], an
//! in-memory host built from static markup that the CLI and the test suites run against.

pub mod document;
pub mod html;
pub mod model;

pub use document::PageDocument;
pub use error::{AdapterError, AdapterErrorKind};
pub use html::{EventRecord, HtmlPage};
pub use ids::NodeId;
pub use model::{DomEvent, DomView, ElementInfo};

pub mod ids {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Stable handle for an element inside one document.
    ///
    /// Ids follow document order, so comparing two ids tells which element comes first.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct NodeId(pub usize);

    impl fmt::Display for NodeId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "node-{}", self.0)
        }
    }
}

pub mod error {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use thiserror::Error;

    /// High-level error categories surfaced by a page host.
    #[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
    pub enum AdapterErrorKind {
        #[error("node not found")]
        NodeNotFound,
        #[error("invalid selector")]
        InvalidSelector,
        #[error("access denied")]
        AccessDenied,
        #[error("operation not supported by element")]
        Unsupported,
        #[error("option not found")]
        OptionNotFound,
        #[error("internal error")]
        Internal,
    }

    /// Enriched error metadata passed back to higher layers.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AdapterError {
        pub kind: AdapterErrorKind,
        pub hint: Option<String>,
    }

    impl fmt::Display for AdapterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.kind)?;
            if let Some(hint) = &self.hint {
                write!(f, ": {}", hint)?;
            }
            Ok(())
        }
    }

    impl std::error::Error for AdapterError {}

    impl AdapterError {
        pub fn new(kind: AdapterErrorKind) -> Self {
            Self { kind, hint: None }
        }

        pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
            self.hint = Some(hint.into());
            self
        }

        pub fn node_not_found(node: super::NodeId) -> Self {
            Self::new(AdapterErrorKind::NodeNotFound).with_hint(node.to_string())
        }

        pub fn is_access_denied(&self) -> bool {
            self.kind == AdapterErrorKind::AccessDenied
        }
    }
}
