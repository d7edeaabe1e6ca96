//! Core types for workflow execution

use action_locator::LocatorHint;
use action_primitives::{ActionError, InputPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FlowError;

/// Plan name used for caller-supplied step lists.
pub const CUSTOM_WORKFLOW: &str = "custom_workflow";

/// Step kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Click,
    Type,
    Wait,
}

impl StepKind {
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Click => "click",
            StepKind::Type => "type",
            StepKind::Wait => "wait",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declarative page action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    /// What to do
    pub kind: StepKind,

    /// Target element; `None` lets a type step fall back to the focused field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<LocatorHint>,

    /// Text for type steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Settle delay after the step; `None` uses the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    /// Replace existing content instead of appending
    #[serde(default)]
    pub clear_first: bool,

    /// Human-readable description, used only for reporting
    #[serde(default)]
    pub label: String,
}

impl ActionStep {
    fn new(kind: StepKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            locator: None,
            text: None,
            delay_ms: None,
            clear_first: false,
            label: label.into(),
        }
    }

    pub fn click(locator: LocatorHint, label: impl Into<String>) -> Self {
        Self {
            locator: Some(locator),
            ..Self::new(StepKind::Click, label)
        }
    }

    pub fn type_text(
        locator: Option<LocatorHint>,
        text: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            text: Some(text.into()),
            ..Self::new(StepKind::Type, label)
        }
    }

    pub fn wait(delay_ms: u64, label: impl Into<String>) -> Self {
        Self {
            delay_ms: Some(delay_ms),
            ..Self::new(StepKind::Wait, label)
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn with_clear_first(mut self, clear_first: bool) -> Self {
        self.clear_first = clear_first;
        self
    }

    /// Shape check: clicks need a locator, type steps need text.
    pub fn validate(&self) -> Result<(), FlowError> {
        match self.kind {
            StepKind::Click if self.locator.is_none() => Err(FlowError::ValidationFailed(
                format!("click step '{}' has no locator", self.label),
            )),
            StepKind::Type if self.text.is_none() => Err(FlowError::ValidationFailed(format!(
                "type step '{}' has no text",
                self.label
            ))),
            _ => Ok(()),
        }
    }
}

/// What the intent resolver asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum ActionPlan {
    /// A named template bound to run-time text
    Template {
        template_name: String,
        #[serde(default)]
        bound_text: String,
    },

    /// A literal step list
    Custom { steps: Vec<ActionStep> },
}

impl ActionPlan {
    pub fn template(name: impl Into<String>, bound_text: impl Into<String>) -> Self {
        ActionPlan::Template {
            template_name: name.into(),
            bound_text: bound_text.into(),
        }
    }

    pub fn custom(steps: Vec<ActionStep>) -> Self {
        ActionPlan::Custom { steps }
    }

    pub fn workflow_name(&self) -> &str {
        match self {
            ActionPlan::Template { template_name, .. } => template_name,
            ActionPlan::Custom { .. } => CUSTOM_WORKFLOW,
        }
    }
}

/// Per-step result category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    NotFound,
    ExecutionError,
}

impl StepStatus {
    /// Missing anchors are `NotFound`; every other failure is an execution error.
    pub fn for_error(err: &ActionError) -> Self {
        if err.is_not_found() {
            StepStatus::NotFound
        } else {
            StepStatus::ExecutionError
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Success)
    }
}

/// Step execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Zero-based position in the executed sequence
    pub index: usize,

    /// Step label
    pub label: String,

    pub status: StepStatus,

    /// Human-readable result text
    pub detail: String,

    /// Start time
    pub started_at: DateTime<Utc>,

    /// Latency in milliseconds, settle delay excluded
    pub latency_ms: u64,
}

impl StepOutcome {
    /// Create a new step outcome
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            status: StepStatus::ExecutionError,
            detail: String::new(),
            started_at: Utc::now(),
            latency_ms: 0,
        }
    }

    /// Mark as success
    pub fn with_success(mut self, detail: impl Into<String>) -> Self {
        self.status = StepStatus::Success;
        self.detail = detail.into();
        self
    }

    /// Mark as failure
    pub fn with_failure(mut self, status: StepStatus, detail: impl Into<String>) -> Self {
        self.status = status;
        self.detail = detail.into();
        self
    }

    /// Calculate latency
    pub fn finish(mut self) -> Self {
        self.latency_ms = (Utc::now() - self.started_at).num_milliseconds().max(0) as u64;
        self
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.status {
            StepStatus::Success => "ok",
            StepStatus::NotFound => "not found",
            StepStatus::ExecutionError => "error",
        };
        write!(f, "Step {} [{}] {}: {}", self.index + 1, mark, self.label, self.detail)
    }
}

/// Workflow execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Template name or `custom_workflow`
    pub workflow_name: String,

    /// True unless the plan itself could not be resolved
    pub success: bool,

    pub steps_executed: usize,

    /// One outcome per executed step, in order
    pub outcomes: Vec<StepOutcome>,

    /// Plan-level error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Start time
    pub started_at: DateTime<Utc>,

    /// Finish time
    pub finished_at: DateTime<Utc>,

    /// Total latency in milliseconds
    pub latency_ms: u64,
}

impl ExecutionReport {
    /// Create a new report
    pub fn new(workflow_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            workflow_name: workflow_name.into(),
            success: false,
            steps_executed: 0,
            outcomes: Vec::new(),
            error: None,
            started_at: now,
            finished_at: now,
            latency_ms: 0,
        }
    }

    /// Mark as success
    pub fn with_success(mut self) -> Self {
        self.success = true;
        self.error = None;
        self
    }

    /// Mark as failure
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    /// Add step outcome
    pub fn with_outcome(mut self, outcome: StepOutcome) -> Self {
        self.outcomes.push(outcome);
        self.steps_executed = self.outcomes.len();
        self
    }

    /// Set finish time and calculate latency
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self
    }

    pub fn succeeded_steps(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_success())
            .count()
    }

    pub fn summary(&self) -> String {
        match &self.error {
            Some(error) => format!("Workflow \"{}\" failed: {}", self.workflow_name, error),
            None => format!(
                "Workflow \"{}\" completed: {}/{} steps succeeded",
                self.workflow_name,
                self.succeeded_steps(),
                self.steps_executed
            ),
        }
    }
}

/// Loosely typed form value, parsed at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, FlowError> {
        match value {
            serde_json::Value::Bool(flag) => Ok(FieldValue::Bool(*flag)),
            serde_json::Value::Number(number) => Ok(FieldValue::Number(number.clone())),
            serde_json::Value::String(text) => Ok(FieldValue::Text(text.clone())),
            other => Err(FlowError::ValidationFailed(format!(
                "unsupported field value: {other}"
            ))),
        }
    }

    /// Booleans carry both a checked flag and their text form so text fields still get a value.
    pub fn to_payload(&self) -> InputPayload {
        match self {
            FieldValue::Bool(flag) => InputPayload {
                text: Some(flag.to_string()),
                checked: Some(*flag),
                selected: None,
            },
            FieldValue::Number(number) => InputPayload::text(number.to_string()),
            FieldValue::Text(text) => InputPayload::text(text.clone()),
        }
    }
}

/// Fields to fill on the current page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFillRequest {
    /// Ordered `(locator, value)` pairs
    pub fields: Vec<(LocatorHint, FieldValue)>,

    /// Submit the first form once at least one field changed
    #[serde(default)]
    pub submit: bool,
}

impl FormFillRequest {
    /// Parses a `{locator: value}` object.
    pub fn from_json(data: &serde_json::Value, submit: bool) -> Result<Self, FlowError> {
        let object = data.as_object().ok_or_else(|| {
            FlowError::ValidationFailed("form data must be an object".to_string())
        })?;
        let fields = object
            .iter()
            .map(|(key, value)| {
                let hint = LocatorHint::parse(key)
                    .map_err(|err| FlowError::ValidationFailed(err.to_string()))?;
                Ok((hint, FieldValue::from_json(value)?))
            })
            .collect::<Result<Vec<_>, FlowError>>()?;
        Ok(Self { fields, submit })
    }
}

/// Form filling result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFillReport {
    /// One outcome per requested field
    pub outcomes: Vec<StepOutcome>,

    /// Fields whose state changed
    pub filled: usize,

    pub total: usize,

    /// Submit attempt, when requested and something was filled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<StepOutcome>,
}

impl FormFillReport {
    pub fn summary(&self) -> String {
        format!("Filled {}/{} fields", self.filled, self.total)
    }

    pub fn submitted(&self) -> bool {
        self.submission
            .as_ref()
            .map(|outcome| outcome.status.is_success())
            .unwrap_or(false)
    }
}
