//! Workflow templates: built-in catalog plus optional YAML extensions

use action_locator::LocatorHint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::errors::FlowError;
use crate::types::{ActionStep, StepKind, CUSTOM_WORKFLOW};

/// Named, ordered step sequence with a text placeholder.
///
/// Every `type` step receives the bound text when the template is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub steps: Vec<ActionStep>,
}

impl WorkflowTemplate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, steps: Vec<ActionStep>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps,
        }
    }

    /// Concrete steps with `text` substituted into every type step.
    pub fn bind(&self, text: &str) -> Vec<ActionStep> {
        self.steps
            .iter()
            .cloned()
            .map(|mut step| {
                if step.kind == StepKind::Type {
                    step.text = Some(text.to_string());
                }
                step
            })
            .collect()
    }

    fn validate(&self) -> Result<(), FlowError> {
        if self.name.trim().is_empty() {
            return Err(FlowError::InvalidStructure("template name is empty".to_string()));
        }
        if self.name == CUSTOM_WORKFLOW {
            return Err(FlowError::InvalidStructure(format!(
                "'{CUSTOM_WORKFLOW}' is reserved"
            )));
        }
        if self.steps.is_empty() {
            return Err(FlowError::InvalidStructure(format!(
                "template '{}' has no steps",
                self.name
            )));
        }
        for step in &self.steps {
            if step.kind == StepKind::Click && step.locator.is_none() {
                return Err(FlowError::InvalidStructure(format!(
                    "template '{}': click step '{}' has no locator",
                    self.name, step.label
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<WorkflowTemplate>,
}

/// Immutable set of templates handed to the runner.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, WorkflowTemplate>,
}

impl TemplateCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `youtube_comment`, `amazon_review`, `linkedin_post` and `reddit_comment`.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for template in builtin_templates() {
            catalog.templates.insert(template.name.clone(), template);
        }
        catalog
    }

    pub fn parse_yaml(source: &str) -> Result<Vec<WorkflowTemplate>, FlowError> {
        let file: TemplateFile = serde_yaml::from_str(source)
            .map_err(|err| FlowError::InvalidStructure(err.to_string()))?;
        for template in &file.templates {
            template.validate()?;
        }
        Ok(file.templates)
    }

    pub fn load_file(path: &Path) -> Result<Vec<WorkflowTemplate>, FlowError> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| FlowError::TemplateIo(format!("{}: {err}", path.display())))?;
        Self::parse_yaml(&source)
    }

    /// Adds templates; a name already present is replaced with a warning.
    pub fn extend(mut self, templates: Vec<WorkflowTemplate>) -> Self {
        for template in templates {
            if self.templates.contains_key(&template.name) {
                warn!(template = %template.name, "template overrides an existing definition");
            } else {
                debug!(template = %template.name, "registered template");
            }
            self.templates.insert(template.name.clone(), template);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&WorkflowTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn templates(&self) -> impl Iterator<Item = &WorkflowTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn bind(&self, name: &str, text: &str) -> Option<Vec<ActionStep>> {
        self.get(name).map(|template| template.bind(text))
    }
}

fn click(selector: &str, label: &str, delay_ms: u64) -> ActionStep {
    ActionStep::click(LocatorHint::query(selector), label).with_delay(delay_ms)
}

fn type_placeholder(label: &str, delay_ms: u64) -> ActionStep {
    ActionStep::type_text(None, String::new(), label).with_delay(delay_ms)
}

fn builtin_templates() -> Vec<WorkflowTemplate> {
    vec![
        WorkflowTemplate::new(
            "youtube_comment",
            "Click comment box, type text, submit comment",
            vec![
                click(
                    r#"#contenteditable-root, [contenteditable="true"]"#,
                    "Click comment box",
                    1000,
                ),
                type_placeholder("Type comment text", 500),
                click(
                    r#"#submit-button, [aria-label*="Comment"]"#,
                    "Click comment button",
                    1000,
                ),
            ],
        ),
        WorkflowTemplate::new(
            "amazon_review",
            "Click review area, type review, rate, submit",
            vec![
                click(
                    r#"[data-hook="review-body"] textarea, #reviewText"#,
                    "Click review text area",
                    1000,
                ),
                type_placeholder("Type review text", 500),
                click(
                    r#"[data-hook="ryp-review-submit-button"], .ryp-star-rating a"#,
                    "Click rating stars first",
                    1000,
                ),
                click(
                    r#"button[type="submit"], [name="submit.add-to-cart"]"#,
                    "Submit review",
                    1000,
                ),
            ],
        ),
        WorkflowTemplate::new(
            "linkedin_post",
            "Open share box, type post, publish",
            vec![
                click(
                    r#"[data-control-name="share-to-linkedin"]"#,
                    "Click share box",
                    1000,
                ),
                type_placeholder("Type post content", 500),
                click(
                    r#"[data-control-name="share.post"]"#,
                    "Click post button",
                    1000,
                ),
            ],
        ),
        WorkflowTemplate::new(
            "reddit_comment",
            "Click comment box, type text, submit comment",
            vec![
                click(
                    r#"[data-testid="comment-submission-form-richtext"], .RichEditor-root"#,
                    "Click comment box",
                    1000,
                ),
                type_placeholder("Type comment text", 500),
                click(
                    r#"button[type="submit"], [data-testid="comment-submission-form-submit-button"]"#,
                    "Submit comment",
                    1000,
                ),
            ],
        ),
    ]
}
