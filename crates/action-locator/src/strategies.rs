//! Element resolution strategies
//!
//! Each strategy is a thin async wrapper over a pure matcher on [`DomView`], so the matchers can
//! be exercised directly against a synthetic element list. Only the selector strategy talks to
//! the host document, because structural selector matching belongs to the host.

use async_trait::async_trait;
use page_adapter::{AdapterErrorKind, DomView, ElementInfo, NodeId, PageDocument};
use std::sync::Arc;
use tracing::debug;

use crate::{errors::LocatorError, types::*};

/// Inputs shared by every strategy during one resolution.
pub struct LocateRequest<'a> {
    pub hint: &'a LocatorHint,
    pub context: &'a ResolveContext,
    pub document: &'a dyn PageDocument,
    pub view: &'a DomView,
}

/// Strategy trait for element resolution
#[async_trait]
pub trait Strategy: Send + Sync {
    /// `Ok(None)` means "not applicable or no match"; the chain moves on.
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError>;

    /// Get strategy type
    fn strategy_type(&self) -> LocatorStrategy;

    /// Get strategy name
    fn name(&self) -> &'static str {
        self.strategy_type().name()
    }
}

/// Build the stock strategy for a chain position.
pub fn strategy_for(strategy: LocatorStrategy) -> Arc<dyn Strategy> {
    match strategy {
        LocatorStrategy::ActiveElement => Arc::new(ActiveElementStrategy),
        LocatorStrategy::Selector => Arc::new(SelectorStrategy),
        LocatorStrategy::ElementId => Arc::new(ElementIdStrategy),
        LocatorStrategy::AriaLabel => Arc::new(AriaLabelStrategy),
        LocatorStrategy::Placeholder => Arc::new(PlaceholderStrategy),
        LocatorStrategy::LabelText => Arc::new(LabelTextStrategy),
        LocatorStrategy::FieldKeyword => Arc::new(FieldKeywordStrategy),
        LocatorStrategy::PurposeKeyword => Arc::new(PurposeKeywordStrategy),
    }
}

/// Focused element, unless focus rests on the page root.
pub struct ActiveElementStrategy;

#[async_trait]
impl Strategy for ActiveElementStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        if !request.hint.is_active_element() {
            return Ok(None);
        }
        Ok(match_active_element(request.view))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::ActiveElement
    }
}

/// Each comma-separated pattern as a structural selector, first hit wins.
pub struct SelectorStrategy;

#[async_trait]
impl Strategy for SelectorStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        for pattern in request.hint.patterns() {
            match request.document.query_selector_all(&pattern).await {
                Ok(nodes) => {
                    if let Some(node) = nodes.first() {
                        debug!(pattern = %pattern, node = %node, "selector pattern matched");
                        return Ok(Some(*node));
                    }
                }
                // Free text routinely fails to parse as a selector.
                Err(err) if err.kind == AdapterErrorKind::InvalidSelector => {
                    debug!(pattern = %pattern, "pattern is not a valid selector");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(None)
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::Selector
    }
}

pub struct ElementIdStrategy;

#[async_trait]
impl Strategy for ElementIdStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        Ok(request
            .hint
            .as_query()
            .and_then(|query| match_element_id(request.view, query)))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::ElementId
    }
}

pub struct AriaLabelStrategy;

#[async_trait]
impl Strategy for AriaLabelStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        Ok(request
            .hint
            .as_query()
            .and_then(|query| match_aria_label(request.view, query)))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::AriaLabel
    }
}

pub struct PlaceholderStrategy;

#[async_trait]
impl Strategy for PlaceholderStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        Ok(request
            .hint
            .as_query()
            .and_then(|query| match_placeholder(request.view, query)))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::Placeholder
    }
}

pub struct LabelTextStrategy;

#[async_trait]
impl Strategy for LabelTextStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        Ok(request
            .hint
            .as_query()
            .and_then(|query| match_label_text(request.view, query)))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::LabelText
    }
}

pub struct FieldKeywordStrategy;

#[async_trait]
impl Strategy for FieldKeywordStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        Ok(request
            .hint
            .as_query()
            .and_then(|query| match_field_keyword(request.view, query)))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::FieldKeyword
    }
}

pub struct PurposeKeywordStrategy;

#[async_trait]
impl Strategy for PurposeKeywordStrategy {
    async fn locate(&self, request: &LocateRequest<'_>) -> Result<Option<NodeId>, LocatorError> {
        Ok(request
            .context
            .purpose
            .as_deref()
            .and_then(|purpose| match_purpose(request.view, purpose)))
    }

    fn strategy_type(&self) -> LocatorStrategy {
        LocatorStrategy::PurposeKeyword
    }
}

/// Purpose keyword and the needles that identify a matching clickable.
struct PurposeRule {
    keyword: &'static str,
    text_needles: &'static [&'static str],
    label_needles: &'static [&'static str],
}

const PURPOSE_RULES: &[PurposeRule] = &[
    PurposeRule {
        keyword: "comment",
        text_needles: &["comment", "submit"],
        label_needles: &["comment"],
    },
    PurposeRule {
        keyword: "reply",
        text_needles: &["reply", "submit"],
        label_needles: &["reply"],
    },
    PurposeRule {
        keyword: "post",
        text_needles: &["post"],
        label_needles: &["post"],
    },
    PurposeRule {
        keyword: "submit",
        text_needles: &["submit"],
        label_needles: &["submit"],
    },
];

const FIELD_KEYWORDS: &[&str] = &["email", "password"];

pub fn match_active_element(view: &DomView) -> Option<NodeId> {
    view.active_element()
        .filter(|active| !view.is_page_root(*active))
}

pub fn match_element_id(view: &DomView, raw: &str) -> Option<NodeId> {
    view.iter()
        .find(|info| info.attr("id") == Some(raw))
        .map(|info| info.id)
}

/// Case-sensitive, like an `[aria-label*=…]` selector.
pub fn match_aria_label(view: &DomView, needle: &str) -> Option<NodeId> {
    view.iter()
        .find(|info| {
            info.attr("aria-label")
                .map(|label| label.contains(needle))
                .unwrap_or(false)
        })
        .map(|info| info.id)
}

pub fn match_placeholder(view: &DomView, needle: &str) -> Option<NodeId> {
    view.iter()
        .filter(|info| info.accepts_text())
        .find(|info| {
            info.attr("placeholder")
                .map(|placeholder| placeholder.contains(needle))
                .unwrap_or(false)
        })
        .map(|info| info.id)
}

/// Labels whose text contains the needle, case-insensitively. The bound control (`for`) wins
/// over a nested one.
pub fn match_label_text(view: &DomView, needle: &str) -> Option<NodeId> {
    let needle = needle.to_lowercase();
    view.by_tag("label")
        .filter(|label| label.text.to_lowercase().contains(&needle))
        .find_map(|label| {
            let bound = label
                .attr("for")
                .filter(|target| !target.is_empty())
                .and_then(|target| match_element_id(view, target));
            bound.or_else(|| {
                view.descendants(label.id)
                    .find(|info| info.is_form_control())
                    .map(|info| info.id)
            })
        })
}

pub fn match_field_keyword(view: &DomView, hint: &str) -> Option<NodeId> {
    let hint = hint.to_lowercase();
    FIELD_KEYWORDS
        .iter()
        .filter(|keyword| hint.contains(*keyword))
        .find_map(|keyword| {
            view.by_tag("input")
                .find(|info| input_matches_keyword(info, keyword))
                .map(|info| info.id)
        })
}

fn input_matches_keyword(info: &ElementInfo, keyword: &str) -> bool {
    if info.input_type().as_deref() == Some(keyword) {
        return true;
    }
    ["name", "id"].iter().any(|attr| {
        info.attr(attr)
            .map(|value| value.to_lowercase().contains(keyword))
            .unwrap_or(false)
    })
}

pub fn match_purpose(view: &DomView, purpose: &str) -> Option<NodeId> {
    let purpose = purpose.to_lowercase();
    let rule = PURPOSE_RULES
        .iter()
        .find(|rule| purpose.contains(rule.keyword))?;

    view.iter()
        .filter(|info| info.is_clickable())
        .find(|info| {
            let text = info.text.to_lowercase();
            let label = info.attr("aria-label").unwrap_or_default().to_lowercase();
            rule.text_needles.iter().any(|needle| text.contains(needle))
                || rule.label_needles.iter().any(|needle| label.contains(needle))
        })
        .map(|info| info.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(
        id: usize,
        tag: &str,
        attrs: &[(&str, &str)],
        parent: Option<usize>,
        text: &str,
    ) -> ElementInfo {
        ElementInfo {
            id: NodeId(id),
            tag: tag.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            parent: parent.map(NodeId),
            text: text.to_string(),
            value: String::new(),
            checked: false,
            content_editable: false,
        }
    }

    fn login_view(active: Option<usize>) -> DomView {
        DomView::new(
            vec![
                element(0, "html", &[], None, ""),
                element(1, "body", &[], Some(0), ""),
                element(2, "label", &[("for", "mail")], Some(1), "Your E-mail"),
                element(3, "input", &[("id", "mail"), ("name", "login")], Some(1), ""),
                element(4, "label", &[], Some(1), "Secret word"),
                element(5, "input", &[("type", "password"), ("name", "pw")], Some(4), ""),
                element(6, "input", &[("placeholder", "Search the site")], Some(1), ""),
                element(7, "div", &[("role", "button"), ("aria-label", "Add a comment")], Some(1), ""),
                element(8, "button", &[], Some(1), "Submit"),
            ],
            active.map(NodeId),
        )
    }

    #[test]
    fn active_element_skips_page_root() {
        assert_eq!(match_active_element(&login_view(Some(1))), None);
        assert_eq!(match_active_element(&login_view(Some(6))), Some(NodeId(6)));
        assert_eq!(match_active_element(&login_view(None)), None);
    }

    #[test]
    fn label_prefers_bound_control_then_nested() {
        let view = login_view(None);
        assert_eq!(match_label_text(&view, "e-MAIL"), Some(NodeId(3)));
        assert_eq!(match_label_text(&view, "secret"), Some(NodeId(5)));
        assert_eq!(match_label_text(&view, "phone"), None);
    }

    #[test]
    fn placeholder_and_aria_label_are_substrings() {
        let view = login_view(None);
        assert_eq!(match_placeholder(&view, "Search"), Some(NodeId(6)));
        assert_eq!(match_aria_label(&view, "comment"), Some(NodeId(7)));
        assert_eq!(match_aria_label(&view, "COMMENT"), None);
    }

    #[test]
    fn field_keywords_match_type_or_name() {
        let view = login_view(None);
        assert_eq!(match_field_keyword(&view, "password field"), Some(NodeId(5)));
        assert_eq!(match_field_keyword(&view, "username"), None);
    }

    #[test]
    fn purpose_scans_clickables_in_document_order() {
        let view = login_view(None);
        assert_eq!(match_purpose(&view, "Click comment button"), Some(NodeId(7)));
        assert_eq!(match_purpose(&view, "Submit review"), Some(NodeId(8)));
        assert_eq!(match_purpose(&view, "Open settings"), None);
    }
}
