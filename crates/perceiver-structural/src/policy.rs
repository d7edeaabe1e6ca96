use serde::{Deserialize, Serialize};

/// Caps applied to every snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotLimits {
    pub text_max_chars: usize,
    pub markup_max_chars: usize,
    pub max_links: usize,
    pub max_images: usize,
    pub max_buttons: usize,
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        Self {
            text_max_chars: 8000,
            markup_max_chars: 12000,
            max_links: 20,
            max_images: 10,
            max_buttons: 15,
        }
    }
}
