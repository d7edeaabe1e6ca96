//! Core data types for action primitives

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Values that read as "off" when a payload drives a checkbox.
const FALSY_TEXT: &[&str] = &["", "false", "0", "off", "no"];

/// Execution context for one primitive invocation
#[derive(Clone, Debug)]
pub struct ExecCtx {
    /// Unique identifier for this action
    pub action_id: String,

    /// When the action started
    pub started_at: DateTime<Utc>,
}

impl ExecCtx {
    pub fn new() -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as u64
    }
}

impl Default for ExecCtx {
    fn default() -> Self {
        Self::new()
    }
}

/// Value carried into the input simulator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPayload {
    /// Text to type, or a loosely typed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Explicit checked state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    /// Option value for select controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl InputPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn selected(value: impl Into<String>) -> Self {
        Self {
            selected: Some(value.into()),
            ..Self::default()
        }
    }

    /// Checkbox reading: explicit flag first, then text truthiness.
    pub fn is_truthy(&self) -> bool {
        if let Some(checked) = self.checked {
            return checked;
        }
        self.value()
            .map(|value| !FALSY_TEXT.contains(&value.trim().to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// String form used for option and radio matching.
    pub fn value(&self) -> Option<&str> {
        self.selected.as_deref().or(self.text.as_deref())
    }

    /// Character count only; never the text itself.
    pub fn text_len(&self) -> usize {
        self.text.as_deref().map(|t| t.chars().count()).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOptions {
    /// Replace existing content instead of appending
    #[serde(default)]
    pub clear_first: bool,
}

impl InputOptions {
    pub fn clear_first() -> Self {
        Self { clear_first: true }
    }
}

/// Element capability the simulator dispatched on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    ContentEditable,
    TextField,
    Checkbox,
    Radio,
    Select,
    Frame,
}

/// Result of one successful `apply`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedInput {
    pub kind: TargetKind,

    /// Whether the element state actually changed
    pub changed: bool,

    /// Human-readable summary
    pub detail: String,
}

impl AppliedInput {
    pub fn changed(kind: TargetKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            changed: true,
            detail: detail.into(),
        }
    }

    pub fn unchanged(kind: TargetKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            changed: false,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_prefers_explicit_flag() {
        assert!(InputPayload::checked(true).is_truthy());
        assert!(!InputPayload::text("No").is_truthy());
        assert!(!InputPayload::text(" 0 ").is_truthy());
        assert!(InputPayload::text("yes").is_truthy());
        assert!(!InputPayload::default().is_truthy());
    }

    #[test]
    fn value_prefers_selected() {
        let payload = InputPayload {
            text: Some("typed".into()),
            selected: Some("chosen".into()),
            checked: None,
        };
        assert_eq!(payload.value(), Some("chosen"));
    }
}
