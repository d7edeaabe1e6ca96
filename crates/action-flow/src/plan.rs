//! Boundary parsing of intent-resolver function-call arguments

use action_locator::LocatorHint;
use serde_json::{Map, Value};

use crate::errors::FlowError;
use crate::types::{ActionPlan, ActionStep, StepKind, CUSTOM_WORKFLOW};

impl ActionPlan {
    /// Parses `execute_workflow` arguments:
    /// `{workflow_type, text_content?, custom_steps?: [{action, selector?, text?, delay?, description?, clear_first?}]}`.
    pub fn from_call_args(args: &Value) -> Result<Self, FlowError> {
        let object = args
            .as_object()
            .ok_or_else(|| invalid("workflow arguments must be an object"))?;

        let workflow_type = required_str(object, "workflow_type")?;
        if workflow_type == CUSTOM_WORKFLOW {
            let steps = match object.get("custom_steps") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| parse_step(index, item))
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => return Err(invalid("custom_steps must be an array")),
            };
            return Ok(ActionPlan::Custom { steps });
        }

        let bound_text = optional_str(object, "text_content")?.unwrap_or_default();
        Ok(ActionPlan::Template {
            template_name: workflow_type.to_string(),
            bound_text: bound_text.to_string(),
        })
    }
}

fn parse_step(index: usize, item: &Value) -> Result<ActionStep, FlowError> {
    let object = item
        .as_object()
        .ok_or_else(|| invalid(format!("step {} must be an object", index + 1)))?;

    let kind = match required_str(object, "action")?.trim().to_ascii_lowercase().as_str() {
        "click" => StepKind::Click,
        "type" => StepKind::Type,
        "wait" => StepKind::Wait,
        other => {
            return Err(invalid(format!(
                "step {}: unknown action '{other}'",
                index + 1
            )))
        }
    };

    let locator = match optional_str(object, "selector")? {
        Some(raw) if !raw.trim().is_empty() => Some(
            LocatorHint::parse(raw)
                .map_err(|err| invalid(format!("step {}: {err}", index + 1)))?,
        ),
        _ => None,
    };

    let delay_ms = match object.get("delay") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_u64().ok_or_else(|| {
            invalid(format!("step {}: delay must be a non-negative integer", index + 1))
        })?),
    };

    let clear_first = match object.get("clear_first") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            return Err(invalid(format!(
                "step {}: clear_first must be a boolean",
                index + 1
            )))
        }
    };

    let label = optional_str(object, "description")?
        .map(str::to_string)
        .unwrap_or_else(|| format!("Step {} ({})", index + 1, kind));

    Ok(ActionStep {
        kind,
        locator,
        text: optional_str(object, "text")?.map(str::to_string),
        delay_ms,
        clear_first,
        label,
    })
}

fn required_str<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a str, FlowError> {
    optional_str(object, key)?.ok_or_else(|| invalid(format!("missing '{key}'")))
}

fn optional_str<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>, FlowError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(invalid(format!("'{key}' must be a string"))),
    }
}

fn invalid(message: impl Into<String>) -> FlowError {
    FlowError::ValidationFailed(message.into())
}
