//! Read-only element view shared by the locator, the simulator and the perceiver.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::NodeId;

/// Input types that accept free text.
const TEXT_INPUT_TYPES: &[&str] = &[
    "text", "email", "password", "search", "tel", "url", "number",
];

/// Synthetic events a framework-bound page may observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEvent {
    KeyDown,
    Input,
    KeyUp,
    Change,
    Focus,
    Blur,
    Click,
    Submit,
}

impl DomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomEvent::KeyDown => "keydown",
            DomEvent::Input => "input",
            DomEvent::KeyUp => "keyup",
            DomEvent::Change => "change",
            DomEvent::Focus => "focus",
            DomEvent::Blur => "blur",
            DomEvent::Click => "click",
            DomEvent::Submit => "submit",
        }
    }
}

impl fmt::Display for DomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a single attached element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Element handle
    pub id: NodeId,

    /// Lowercase tag name
    pub tag: String,

    /// Attributes in source order
    pub attributes: Vec<(String, String)>,

    /// Parent element, `None` for the document element
    pub parent: Option<NodeId>,

    /// Visible text with whitespace collapsed
    pub text: String,

    /// Live value for form controls, empty otherwise
    pub value: String,

    /// Live checked state for checkboxes and radios
    pub checked: bool,

    /// Whether the element (or an ancestor) is content-editable
    pub content_editable: bool,
}

impl ElementInfo {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// The DOM `type` property: lowercased attribute for inputs, with the
    /// browser defaults for the other form controls.
    pub fn input_type(&self) -> Option<String> {
        match self.tag.as_str() {
            "input" => Some(
                self.attr("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "text".to_string()),
            ),
            "textarea" => Some("textarea".to_string()),
            "select" => Some("select-one".to_string()),
            "button" => Some(
                self.attr("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .unwrap_or_else(|| "submit".to_string()),
            ),
            _ => None,
        }
    }

    pub fn is_text_like(&self) -> bool {
        match self.tag.as_str() {
            "textarea" => true,
            "input" => self
                .input_type()
                .map(|t| TEXT_INPUT_TYPES.contains(&t.as_str()))
                .unwrap_or(false),
            _ => false,
        }
    }

    pub fn is_checkbox(&self) -> bool {
        self.is_tag("input") && self.input_type().as_deref() == Some("checkbox")
    }

    pub fn is_radio(&self) -> bool {
        self.is_tag("input") && self.input_type().as_deref() == Some("radio")
    }

    pub fn is_password(&self) -> bool {
        self.is_tag("input") && self.input_type().as_deref() == Some("password")
    }

    pub fn is_select(&self) -> bool {
        self.is_tag("select")
    }

    pub fn is_iframe(&self) -> bool {
        self.is_tag("iframe")
    }

    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }

    /// Buttons and anything declaring `role="button"`.
    pub fn is_clickable(&self) -> bool {
        self.is_tag("button")
            || self
                .attr("role")
                .map(|role| role.trim().eq_ignore_ascii_case("button"))
                .unwrap_or(false)
    }

    /// Target for text entry: content-editable or a text-like field.
    pub fn accepts_text(&self) -> bool {
        self.content_editable || self.is_text_like()
    }
}

/// Ordered view of every attached element in a document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DomView {
    elements: Vec<ElementInfo>,
    active: Option<NodeId>,
}

impl DomView {
    /// Elements must be supplied in document order.
    pub fn new(elements: Vec<ElementInfo>, active: Option<NodeId>) -> Self {
        Self { elements, active }
    }

    pub fn elements(&self) -> &[ElementInfo] {
        &self.elements
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementInfo> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ElementInfo> {
        self.elements
            .binary_search_by_key(&id, |info| info.id)
            .ok()
            .map(|idx| &self.elements[idx])
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// `<html>` and `<body>` stand for "nothing focused".
    pub fn is_page_root(&self, id: NodeId) -> bool {
        self.get(id)
            .map(|info| info.is_tag("html") || info.is_tag("body"))
            .unwrap_or(false)
    }

    pub fn by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ElementInfo> + 'a {
        self.elements.iter().filter(move |info| info.is_tag(tag))
    }

    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.get(node).and_then(|info| info.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|info| info.parent);
        }
        false
    }

    /// Descendants of `ancestor` in document order.
    pub fn descendants<'a>(
        &'a self,
        ancestor: NodeId,
    ) -> impl Iterator<Item = &'a ElementInfo> + 'a {
        self.elements
            .iter()
            .filter(move |info| info.id > ancestor && self.is_descendant(info.id, ancestor))
    }

    pub fn body(&self) -> Option<&ElementInfo> {
        self.by_tag("body").next()
    }

    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.by_tag("meta")
            .find(|info| {
                info.attr("name")
                    .map(|n| n.eq_ignore_ascii_case(name))
                    .unwrap_or(false)
            })
            .and_then(|info| info.attr("content").map(str::to_string))
    }
}
