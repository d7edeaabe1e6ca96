//! Core types for locator system

use page_adapter::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LocatorError;

/// Literal hint meaning "whatever element holds input focus".
pub const ACTIVE_ELEMENT_SENTINEL: &str = "@active";

/// Caller-supplied description of the element to act on.
///
/// Hints are parsed once at the boundary: the sentinel becomes [`LocatorHint::ActiveElement`],
/// anything else is kept verbatim (trimmed) as a query that the strategy chain interprets as
/// selector patterns, an element id, or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocatorHint {
    /// The currently focused element
    ActiveElement,

    /// Selector patterns or free text
    Query(String),
}

impl LocatorHint {
    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocatorError::InvalidHint("empty locator hint".to_string()));
        }
        if trimmed == ACTIVE_ELEMENT_SENTINEL {
            return Ok(LocatorHint::ActiveElement);
        }
        Ok(LocatorHint::Query(trimmed.to_string()))
    }

    pub fn query(text: impl Into<String>) -> Self {
        LocatorHint::Query(text.into())
    }

    pub fn is_active_element(&self) -> bool {
        matches!(self, LocatorHint::ActiveElement)
    }

    /// Raw query text; `None` for the sentinel.
    pub fn as_query(&self) -> Option<&str> {
        match self {
            LocatorHint::ActiveElement => None,
            LocatorHint::Query(text) => Some(text),
        }
    }

    /// Comma-separated selector candidates, in the order given.
    ///
    /// Commas nested inside quotes, brackets or parentheses do not split.
    pub fn patterns(&self) -> Vec<String> {
        match self {
            LocatorHint::ActiveElement => Vec::new(),
            LocatorHint::Query(text) => split_patterns(text),
        }
    }
}

impl fmt::Display for LocatorHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorHint::ActiveElement => f.write_str(ACTIVE_ELEMENT_SENTINEL),
            LocatorHint::Query(text) => f.write_str(text),
        }
    }
}

impl FromStr for LocatorHint {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocatorHint::parse(s)
    }
}

impl TryFrom<String> for LocatorHint {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LocatorHint::parse(&value)
    }
}

impl From<LocatorHint> for String {
    fn from(hint: LocatorHint) -> Self {
        hint.to_string()
    }
}

fn split_patterns(text: &str) -> Vec<String> {
    let mut patterns = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        match (quote, ch) {
            (Some(open), c) if c == open => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') | (None, '(') => {
                depth += 1;
                current.push(ch);
            }
            (None, ']') | (None, ')') => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            (None, ',') if depth == 0 => {
                patterns.push(std::mem::take(&mut current));
            }
            (None, c) => current.push(c),
        }
    }
    patterns.push(current);

    patterns
        .into_iter()
        .map(|pattern| pattern.trim().to_string())
        .filter(|pattern| !pattern.is_empty())
        .collect()
}

/// Locator strategy enumeration
///
/// Variants are listed in fallback order; see [`LocatorStrategy::fallback_chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// Focused element for the sentinel hint
    ActiveElement,

    /// Comma-separated structural selectors
    Selector,

    /// Exact `id` attribute
    ElementId,

    /// `aria-label` substring
    AriaLabel,

    /// `placeholder` substring on text inputs
    Placeholder,

    /// `<label>` text containment
    LabelText,

    /// Email/password field heuristics
    FieldKeyword,

    /// Clickable element matching the step purpose
    PurposeKeyword,
}

impl LocatorStrategy {
    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::ActiveElement => "active-element",
            LocatorStrategy::Selector => "selector",
            LocatorStrategy::ElementId => "element-id",
            LocatorStrategy::AriaLabel => "aria-label",
            LocatorStrategy::Placeholder => "placeholder",
            LocatorStrategy::LabelText => "label-text",
            LocatorStrategy::FieldKeyword => "field-keyword",
            LocatorStrategy::PurposeKeyword => "purpose-keyword",
        }
    }

    /// Get all strategies in fallback order
    pub fn fallback_chain() -> Vec<LocatorStrategy> {
        vec![
            LocatorStrategy::ActiveElement,
            LocatorStrategy::Selector,
            LocatorStrategy::ElementId,
            LocatorStrategy::AriaLabel,
            LocatorStrategy::Placeholder,
            LocatorStrategy::LabelText,
            LocatorStrategy::FieldKeyword,
            LocatorStrategy::PurposeKeyword,
        ]
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extra context that steers the last-resort strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveContext {
    /// Human description of what the step is for, e.g. "Click comment button"
    pub purpose: Option<String>,
}

impl ResolveContext {
    pub fn with_purpose(purpose: impl Into<String>) -> Self {
        Self {
            purpose: Some(purpose.into()),
        }
    }
}

/// Successful resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Resolved element
    pub node: NodeId,

    /// Strategy that produced the match
    pub strategy: LocatorStrategy,
}
