//! Bounded structural page snapshots.
//!
//! A snapshot digests forms, links, images, buttons and meta tags, plus truncated body text and
//! markup. Password values are always reported as [`redact::PASSWORD_MARKER`].

pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod redact;
pub mod structural;

pub use api::StructuralPerceiver;
pub use errors::PerceiverError;
pub use model::{
    ButtonDigest, FieldDigest, FormDigest, ImageDigest, LinkDigest, PageMeta, PageSnapshot,
};
pub use policy::SnapshotLimits;
pub use structural::StructuralPerceiverImpl;
