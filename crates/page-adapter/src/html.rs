//! In-memory host document built from static markup.
//!
//! Structure comes from a one-time `scraper` parse. Live state (form values, focus, editable
//! content, the event log) sits beside it in an arena guarded by a mutex. Selector queries
//! re-parse the original markup and map matches back onto arena ids, so the parsed tree never
//! crosses an await point.

use async_trait::async_trait;
use parking_lot::Mutex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::document::PageDocument;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::ids::NodeId;
use crate::model::{DomEvent, DomView, ElementInfo};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Tags whose text never renders.
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// One observed event, in dispatch order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub node: NodeId,
    pub event: DomEvent,
}

#[derive(Clone, Debug)]
enum Child {
    Text(String),
    Element(NodeId),
}

#[derive(Clone, Debug)]
struct NodeRecord {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<Child>,
    attached: bool,
    value: String,
    checked: bool,
}

impl NodeRecord {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn input_type(&self) -> String {
        self.attr("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    fn is_input_of(&self, kind: &str) -> bool {
        self.tag == "input" && self.input_type() == kind
    }

    fn is_submit_control(&self) -> bool {
        match self.tag.as_str() {
            "button" => self
                .attr("type")
                .map(|t| t.trim().eq_ignore_ascii_case("submit"))
                .unwrap_or(true),
            "input" => matches!(self.input_type().as_str(), "submit" | "image"),
            _ => false,
        }
    }
}

#[derive(Debug)]
struct PageState {
    url: String,
    title: String,
    nodes: Vec<NodeRecord>,
    active: Option<NodeId>,
    events: Vec<EventRecord>,
    mutations: u64,
}

impl PageState {
    fn record(&self, node: NodeId) -> Result<&NodeRecord, AdapterError> {
        self.nodes
            .get(node.0)
            .filter(|record| record.attached)
            .ok_or_else(|| AdapterError::node_not_found(node))
    }

    fn record_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, AdapterError> {
        self.nodes
            .get_mut(node.0)
            .filter(|record| record.attached)
            .ok_or_else(|| AdapterError::node_not_found(node))
    }

    fn push_event(&mut self, node: NodeId, event: DomEvent) {
        self.events.push(EventRecord { node, event });
    }

    /// `textContent`: every text descendant, unmodified.
    fn raw_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, false, &mut out);
        out
    }

    /// Rendered text with runs of whitespace collapsed.
    fn visible_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, true, &mut out);
        collapse_whitespace(&out)
    }

    fn collect_text(&self, node: NodeId, visible_only: bool, out: &mut String) {
        let Some(record) = self.nodes.get(node.0) else {
            return;
        };
        if visible_only && HIDDEN_TEXT_TAGS.contains(&record.tag.as_str()) {
            return;
        }
        for child in &record.children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(id) => {
                    if visible_only {
                        out.push(' ');
                    }
                    self.collect_text(*id, visible_only, out);
                }
            }
        }
    }

    fn is_editable(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(record) = self.nodes.get(id.0) else {
                return false;
            };
            if let Some(flag) = record.attr("contenteditable") {
                let flag = flag.trim().to_ascii_lowercase();
                return matches!(flag.as_str(), "" | "true" | "plaintext-only");
            }
            current = record.parent;
        }
        false
    }

    fn is_focusable(&self, node: NodeId) -> bool {
        let Some(record) = self.nodes.get(node.0) else {
            return false;
        };
        matches!(
            record.tag.as_str(),
            "input" | "textarea" | "select" | "button" | "iframe"
        ) || (record.tag == "a" && record.attr("href").is_some())
            || record.attr("tabindex").is_some()
            || self.is_editable(node)
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(record) = self.nodes.get(id.0) {
                for child in record.children.iter().rev() {
                    if let Child::Element(child_id) = child {
                        stack.push(*child_id);
                    }
                }
            }
            if id != node {
                out.push(id);
            }
        }
        out
    }

    fn options_of(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|id| self.nodes[id.0].tag == "option")
            .collect()
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.nodes[option.0].attr("value") {
            Some(value) => value.to_string(),
            None => collapse_whitespace(&self.raw_text(option)),
        }
    }

    fn enclosing_form(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.nodes.get(node.0).and_then(|record| record.parent);
        while let Some(id) = current {
            let record = self.nodes.get(id.0)?;
            if record.tag == "form" {
                return Some(id);
            }
            current = record.parent;
        }
        None
    }

    fn initialize_form_state(&mut self) {
        for idx in 0..self.nodes.len() {
            let id = NodeId(idx);
            let (value, checked) = match self.nodes[idx].tag.as_str() {
                "input" => {
                    let record = &self.nodes[idx];
                    (
                        record.attr("value").unwrap_or_default().to_string(),
                        record.attr("checked").is_some(),
                    )
                }
                "textarea" => (self.raw_text(id), false),
                "select" => {
                    let options = self.options_of(id);
                    let chosen = options
                        .iter()
                        .copied()
                        .find(|option| self.nodes[option.0].attr("selected").is_some())
                        .or_else(|| options.first().copied());
                    (
                        chosen
                            .map(|option| self.option_value(option))
                            .unwrap_or_default(),
                        false,
                    )
                }
                _ => continue,
            };
            let record = &mut self.nodes[idx];
            record.value = value;
            record.checked = checked;
        }
    }

    fn describe(&self, node: NodeId) -> Result<ElementInfo, AdapterError> {
        let record = self.record(node)?;
        Ok(ElementInfo {
            id: node,
            tag: record.tag.clone(),
            attributes: record.attrs.clone(),
            parent: record.parent,
            text: self.visible_text(node),
            value: record.value.clone(),
            checked: record.checked,
            content_editable: self.is_editable(node),
        })
    }

    fn view(&self) -> DomView {
        let elements = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, record)| record.attached)
            .filter_map(|(idx, _)| self.describe(NodeId(idx)).ok())
            .collect();
        DomView::new(elements, self.active_or_body())
    }

    fn body(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|record| record.attached && record.tag == "body")
            .map(NodeId)
    }

    fn active_or_body(&self) -> Option<NodeId> {
        self.active
            .filter(|id| self.nodes.get(id.0).map(|r| r.attached).unwrap_or(false))
            .or_else(|| self.body())
    }

    fn focus(&mut self, node: NodeId) -> Result<(), AdapterError> {
        self.record(node)?;
        self.mutations += 1;
        if self.active != Some(node) {
            self.active = Some(node);
            self.push_event(node, DomEvent::Focus);
        }
        Ok(())
    }

    fn blur(&mut self, node: NodeId) -> Result<(), AdapterError> {
        self.record(node)?;
        self.mutations += 1;
        if self.active == Some(node) {
            self.active = None;
        }
        self.push_event(node, DomEvent::Blur);
        Ok(())
    }

    fn uncheck_radio_group(&mut self, node: NodeId) {
        let Some(name) = self.nodes[node.0].attr("name").map(str::to_string) else {
            return;
        };
        for (idx, record) in self.nodes.iter_mut().enumerate() {
            if idx != node.0
                && record.attached
                && record.is_input_of("radio")
                && record.attr("name") == Some(name.as_str())
            {
                record.checked = false;
            }
        }
    }

    fn click(&mut self, node: NodeId) -> Result<(), AdapterError> {
        self.record(node)?;
        self.mutations += 1;
        if self.is_focusable(node) && self.active != Some(node) {
            self.active = Some(node);
            self.push_event(node, DomEvent::Focus);
        }
        self.push_event(node, DomEvent::Click);

        let record = &self.nodes[node.0];
        if record.is_input_of("checkbox") {
            let toggled = !record.checked;
            self.nodes[node.0].checked = toggled;
            self.push_event(node, DomEvent::Change);
        } else if record.is_input_of("radio") {
            if !record.checked {
                self.nodes[node.0].checked = true;
                self.uncheck_radio_group(node);
                self.push_event(node, DomEvent::Change);
            }
        } else if record.is_submit_control() {
            if let Some(form) = self.enclosing_form(node) {
                self.push_event(form, DomEvent::Submit);
            }
        }
        Ok(())
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), AdapterError> {
        let tag = self.record(node)?.tag.clone();
        match tag.as_str() {
            "input" | "textarea" => {
                self.nodes[node.0].value = value.to_string();
                self.mutations += 1;
                Ok(())
            }
            "select" => self.select_option(node, value),
            other => Err(AdapterError::new(AdapterErrorKind::Unsupported)
                .with_hint(format!("<{other}> has no value"))),
        }
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<(), AdapterError> {
        let record = self.record_mut(node)?;
        let is_radio = record.is_input_of("radio");
        if !is_radio && !record.is_input_of("checkbox") {
            return Err(AdapterError::new(AdapterErrorKind::Unsupported)
                .with_hint(format!("<{}> is not checkable", record.tag)));
        }
        record.checked = checked;
        self.mutations += 1;
        if is_radio && checked {
            self.uncheck_radio_group(node);
        }
        Ok(())
    }

    fn select_option(&mut self, node: NodeId, value: &str) -> Result<(), AdapterError> {
        let record = self.record(node)?;
        if record.tag != "select" {
            return Err(AdapterError::new(AdapterErrorKind::Unsupported)
                .with_hint(format!("<{}> is not a select", record.tag)));
        }
        let options = self.options_of(node);
        let chosen = options
            .iter()
            .find(|option| self.option_value(**option) == value)
            .or_else(|| {
                options.iter().find(|option| {
                    collapse_whitespace(&self.raw_text(**option)).eq_ignore_ascii_case(value)
                })
            })
            .map(|option| self.option_value(*option))
            .ok_or_else(|| AdapterError::new(AdapterErrorKind::OptionNotFound).with_hint(value))?;
        self.nodes[node.0].value = chosen;
        self.mutations += 1;
        Ok(())
    }

    fn ensure_editable(&self, node: NodeId) -> Result<(), AdapterError> {
        self.record(node)?;
        if self.is_editable(node) {
            Ok(())
        } else {
            Err(AdapterError::new(AdapterErrorKind::Unsupported)
                .with_hint(format!("{node} is not content-editable")))
        }
    }

    fn clear_content(&mut self, node: NodeId) -> Result<(), AdapterError> {
        self.ensure_editable(node)?;
        for id in self.descendants(node) {
            self.nodes[id.0].attached = false;
        }
        self.nodes[node.0].children.clear();
        self.mutations += 1;
        Ok(())
    }

    fn insert_text(&mut self, node: NodeId, text: &str) -> Result<(), AdapterError> {
        self.ensure_editable(node)?;
        let children = &mut self.nodes[node.0].children;
        match children.last_mut() {
            Some(Child::Text(existing)) => existing.push_str(text),
            _ => children.push(Child::Text(text.to_string())),
        }
        self.mutations += 1;
        Ok(())
    }

    fn submit_form(&mut self, node: NodeId) -> Result<(), AdapterError> {
        let record = self.record(node)?;
        if record.tag != "form" {
            return Err(AdapterError::new(AdapterErrorKind::Unsupported)
                .with_hint(format!("<{}> is not a form", record.tag)));
        }
        self.mutations += 1;
        self.push_event(node, DomEvent::Submit);
        Ok(())
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        let record = &self.nodes[node.0];
        out.push('<');
        out.push_str(&record.tag);
        for (key, value) in &record.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value, true));
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&record.tag.as_str()) {
            return;
        }
        let raw = RAW_TEXT_TAGS.contains(&record.tag.as_str());
        for child in &record.children {
            match child {
                Child::Text(text) if raw => out.push_str(text),
                Child::Text(text) => out.push_str(&escape(text, false)),
                Child::Element(id) => self.serialize(*id, out),
            }
        }
        out.push_str("</");
        out.push_str(&record.tag);
        out.push('>');
    }
}

/// In-memory [`PageDocument`] parsed from HTML.
pub struct HtmlPage {
    markup: String,
    state: Mutex<PageState>,
    frames: HashMap<NodeId, Arc<HtmlPage>>,
}

impl std::fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HtmlPage")
            .field("url", &state.url)
            .field("nodes", &state.nodes.len())
            .field("frames", &self.frames.len())
            .finish()
    }
}

impl HtmlPage {
    /// Parses markup into a fresh page at `about:blank`.
    ///
    /// `<iframe srcdoc>` bodies become same-origin inner pages; every other frame is treated
    /// as cross-origin.
    pub fn parse(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let nodes = {
            let html = Html::parse_document(&markup);
            build_arena(&html)
        };

        let mut state = PageState {
            url: "about:blank".to_string(),
            title: String::new(),
            nodes,
            active: None,
            events: Vec::new(),
            mutations: 0,
        };
        state.initialize_form_state();
        state.title = state
            .nodes
            .iter()
            .position(|record| record.tag == "title")
            .map(|idx| collapse_whitespace(&state.raw_text(NodeId(idx))))
            .unwrap_or_default();

        let frames = state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, record)| record.tag == "iframe")
            .filter_map(|(idx, record)| {
                record.attr("srcdoc").map(|doc| {
                    let inner = HtmlPage::parse(doc).with_url("about:srcdoc");
                    (NodeId(idx), Arc::new(inner))
                })
            })
            .collect();

        debug!(elements = state.nodes.len(), "parsed html page");
        Self {
            markup,
            state: Mutex::new(state),
            frames,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.state.get_mut().url = url.into();
        self
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Every event dispatched so far, oldest first.
    pub fn events(&self) -> Vec<EventRecord> {
        self.state.lock().events.clone()
    }

    pub fn events_for(&self, node: NodeId) -> Vec<DomEvent> {
        self.state
            .lock()
            .events
            .iter()
            .filter(|record| record.node == node)
            .map(|record| record.event)
            .collect()
    }

    /// Number of state-changing operations performed against the page.
    pub fn mutation_count(&self) -> u64 {
        self.state.lock().mutations
    }

    /// First attached match for `selector`, if any.
    pub fn select_first(&self, selector: &str) -> Option<NodeId> {
        self.matching(selector).ok()?.into_iter().next()
    }

    pub fn frame(&self, node: NodeId) -> Option<Arc<HtmlPage>> {
        self.frames.get(&node).cloned()
    }

    fn matching(&self, selector: &str) -> Result<Vec<NodeId>, AdapterError> {
        let matches = match_selector(&self.markup, selector)?;
        let state = self.state.lock();
        Ok(matches
            .into_iter()
            .filter(|id| state.nodes.get(id.0).map(|r| r.attached).unwrap_or(false))
            .collect())
    }
}

#[async_trait]
impl PageDocument for HtmlPage {
    async fn url(&self) -> Result<String, AdapterError> {
        Ok(self.state.lock().url.clone())
    }

    async fn title(&self) -> Result<String, AdapterError> {
        Ok(self.state.lock().title.clone())
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, AdapterError> {
        self.matching(selector)
    }

    async fn dom_view(&self) -> Result<DomView, AdapterError> {
        Ok(self.state.lock().view())
    }

    async fn describe(&self, node: NodeId) -> Result<ElementInfo, AdapterError> {
        self.state.lock().describe(node)
    }

    async fn active_element(&self) -> Result<Option<NodeId>, AdapterError> {
        Ok(self.state.lock().active_or_body())
    }

    async fn focus(&self, node: NodeId) -> Result<(), AdapterError> {
        self.state.lock().focus(node)
    }

    async fn blur(&self, node: NodeId) -> Result<(), AdapterError> {
        self.state.lock().blur(node)
    }

    async fn scroll_into_view(&self, node: NodeId) -> Result<(), AdapterError> {
        self.state.lock().record(node).map(|_| ())
    }

    async fn click(&self, node: NodeId) -> Result<(), AdapterError> {
        self.state.lock().click(node)
    }

    async fn value(&self, node: NodeId) -> Result<String, AdapterError> {
        Ok(self.state.lock().record(node)?.value.clone())
    }

    async fn set_value(&self, node: NodeId, value: &str) -> Result<(), AdapterError> {
        self.state.lock().set_value(node, value)
    }

    async fn set_checked(&self, node: NodeId, checked: bool) -> Result<(), AdapterError> {
        self.state.lock().set_checked(node, checked)
    }

    async fn select_option(&self, node: NodeId, value: &str) -> Result<(), AdapterError> {
        self.state.lock().select_option(node, value)
    }

    async fn clear_content(&self, node: NodeId) -> Result<(), AdapterError> {
        self.state.lock().clear_content(node)
    }

    async fn insert_text(&self, node: NodeId, text: &str) -> Result<(), AdapterError> {
        self.state.lock().insert_text(node, text)
    }

    async fn text_content(&self, node: NodeId) -> Result<String, AdapterError> {
        let state = self.state.lock();
        state.record(node)?;
        Ok(state.raw_text(node))
    }

    async fn dispatch_event(&self, node: NodeId, event: DomEvent) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        state.record(node)?;
        state.mutations += 1;
        state.push_event(node, event);
        Ok(())
    }

    async fn frame_document(&self, node: NodeId) -> Result<Arc<dyn PageDocument>, AdapterError> {
        let src = {
            let state = self.state.lock();
            let record = state.record(node)?;
            if record.tag != "iframe" {
                return Err(AdapterError::new(AdapterErrorKind::Unsupported)
                    .with_hint(format!("<{}> is not a frame", record.tag)));
            }
            record.attr("src").unwrap_or("about:blank").to_string()
        };
        match self.frames.get(&node) {
            Some(frame) => Ok(frame.clone() as Arc<dyn PageDocument>),
            None => Err(AdapterError::new(AdapterErrorKind::AccessDenied)
                .with_hint(format!("cross-origin frame {src}"))),
        }
    }

    async fn submit_form(&self, node: NodeId) -> Result<(), AdapterError> {
        self.state.lock().submit_form(node)
    }

    async fn navigate(&self, url: &str) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        state.url = url.to_string();
        state.mutations += 1;
        Ok(())
    }

    async fn body_text(&self) -> Result<String, AdapterError> {
        let state = self.state.lock();
        Ok(state
            .body()
            .map(|body| state.visible_text(body))
            .unwrap_or_default())
    }

    async fn outer_html(&self) -> Result<String, AdapterError> {
        let state = self.state.lock();
        let mut out = String::new();
        if !state.nodes.is_empty() {
            state.serialize(NodeId(0), &mut out);
        }
        Ok(out)
    }
}

fn build_arena(html: &Html) -> Vec<NodeRecord> {
    let elements: Vec<ElementRef<'_>> = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();
    let index: HashMap<_, usize> = elements
        .iter()
        .enumerate()
        .map(|(idx, element)| ((**element).id(), idx))
        .collect();

    elements
        .iter()
        .map(|element| {
            let value = element.value();
            let parent = element
                .parent()
                .and_then(|parent| index.get(&parent.id()).copied())
                .map(NodeId);
            let children = element
                .children()
                .filter_map(|child| match child.value() {
                    Node::Text(text) => {
                        let content: &str = text;
                        Some(Child::Text(content.to_string()))
                    }
                    Node::Element(_) => index
                        .get(&child.id())
                        .copied()
                        .map(|idx| Child::Element(NodeId(idx))),
                    _ => None,
                })
                .collect();
            NodeRecord {
                tag: value.name().to_ascii_lowercase(),
                attrs: value
                    .attrs()
                    .map(|(key, val)| (key.to_ascii_lowercase(), val.to_string()))
                    .collect(),
                parent,
                children,
                attached: true,
                value: String::new(),
                checked: false,
            }
        })
        .collect()
}

fn match_selector(markup: &str, selector: &str) -> Result<Vec<NodeId>, AdapterError> {
    let parsed = Selector::parse(selector).map_err(|err| {
        AdapterError::new(AdapterErrorKind::InvalidSelector).with_hint(format!("{selector}: {err:?}"))
    })?;
    let html = Html::parse_document(markup);
    let index: HashMap<_, usize> = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .enumerate()
        .map(|(idx, element)| ((*element).id(), idx))
        .collect();
    Ok(html
        .select(&parsed)
        .filter_map(|element| index.get(&(*element).id()).copied())
        .map(NodeId)
        .collect())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape(text: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"<html><head><title> Sign up </title></head><body>
        <form id="signup">
          <input id="name" value="Ann">
          <input id="agree" type="checkbox">
          <input type="radio" name="plan" value="free" checked>
          <input type="radio" name="plan" value="pro">
          <select id="country"><option value="fr">France</option><option value="de" selected>Germany</option></select>
          <textarea id="bio">hello</textarea>
          <button id="go">Send</button>
        </form>
        <div id="editor" contenteditable="true"><b>abc</b></div>
        <iframe id="inner" srcdoc="<body contenteditable='true'>x</body>"></iframe>
        <iframe id="remote" src="https://elsewhere.example/"></iframe>
        <script>var hidden = 1;</script>
      </body></html>"#;

    fn page() -> HtmlPage {
        HtmlPage::parse(FORM).with_url("https://forms.example/signup")
    }

    #[tokio::test]
    async fn parses_title_and_initial_values() {
        let page = page();
        assert_eq!(page.title().await.unwrap(), "Sign up");
        let name = page.select_first("#name").unwrap();
        assert_eq!(page.value(name).await.unwrap(), "Ann");
        let country = page.select_first("#country").unwrap();
        assert_eq!(page.value(country).await.unwrap(), "de");
        let bio = page.select_first("#bio").unwrap();
        assert_eq!(page.value(bio).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn invalid_selector_is_reported() {
        let err = page().query_selector_all("##").await.unwrap_err();
        assert_eq!(err.kind, AdapterErrorKind::InvalidSelector);
    }

    #[tokio::test]
    async fn selector_matches_follow_document_order() {
        let page = page();
        let radios = page.query_selector_all("input[type=radio]").await.unwrap();
        assert_eq!(radios.len(), 2);
        assert!(radios[0] < radios[1]);
    }

    #[tokio::test]
    async fn click_toggles_checkbox_and_submits_form() {
        let page = page();
        let agree = page.select_first("#agree").unwrap();
        page.click(agree).await.unwrap();
        assert!(page.describe(agree).await.unwrap().checked);
        assert_eq!(page.active_element().await.unwrap(), Some(agree));

        let go = page.select_first("#go").unwrap();
        let form = page.select_first("#signup").unwrap();
        page.click(go).await.unwrap();
        assert_eq!(page.events_for(form), vec![DomEvent::Submit]);
    }

    #[tokio::test]
    async fn checking_radio_clears_its_group() {
        let page = page();
        let radios = page.query_selector_all("input[name=plan]").await.unwrap();
        page.set_checked(radios[1], true).await.unwrap();
        assert!(!page.describe(radios[0]).await.unwrap().checked);
        assert!(page.describe(radios[1]).await.unwrap().checked);
    }

    #[tokio::test]
    async fn unknown_option_is_rejected() {
        let page = page();
        let country = page.select_first("#country").unwrap();
        let err = page.select_option(country, "xx").await.unwrap_err();
        assert_eq!(err.kind, AdapterErrorKind::OptionNotFound);
        page.select_option(country, "France").await.unwrap();
        assert_eq!(page.value(country).await.unwrap(), "fr");
    }

    #[tokio::test]
    async fn clearing_editable_content_detaches_children() {
        let page = page();
        let editor = page.select_first("#editor").unwrap();
        assert_eq!(page.text_content(editor).await.unwrap(), "abc");
        page.clear_content(editor).await.unwrap();
        page.insert_text(editor, "xyz").await.unwrap();
        assert_eq!(page.text_content(editor).await.unwrap(), "xyz");
        assert!(page.select_first("#editor b").is_none());
    }

    #[tokio::test]
    async fn frames_split_by_origin() {
        let page = page();
        let inner = page.select_first("#inner").unwrap();
        let frame = page.frame_document(inner).await.unwrap();
        assert_eq!(frame.url().await.unwrap(), "about:srcdoc");

        let remote = page.select_first("#remote").unwrap();
        let err = page.frame_document(remote).await.err().unwrap();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn reads_do_not_count_as_mutations() {
        let page = page();
        page.dom_view().await.unwrap();
        page.outer_html().await.unwrap();
        page.body_text().await.unwrap();
        assert_eq!(page.mutation_count(), 0);
        assert!(page.events().is_empty());
    }

    #[tokio::test]
    async fn body_text_skips_scripts() {
        let text = page().body_text().await.unwrap();
        assert!(text.contains("Send"));
        assert!(!text.contains("hidden"));
    }

    #[tokio::test]
    async fn outer_html_escapes_attribute_values() {
        let page = HtmlPage::parse(r#"<p title="a &quot;b&quot;">1 &lt; 2</p>"#);
        let html = page.outer_html().await.unwrap();
        assert!(html.contains(r#"<p title="a &quot;b&quot;">1 &lt; 2</p>"#));
    }
}
