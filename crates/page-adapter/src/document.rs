use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AdapterError;
use crate::ids::NodeId;
use crate::model::{DomEvent, DomView, ElementInfo};

/// Capability surface a host page exposes to the action layers.
///
/// One handle maps to exactly one live document. Implementations perform every operation
/// synchronously against the page; the async signatures exist so hosts backed by a remote
/// transport can suspend.
#[async_trait]
pub trait PageDocument: Send + Sync {
    async fn url(&self) -> Result<String, AdapterError>;
    async fn title(&self) -> Result<String, AdapterError>;

    /// Structural selector lookup in document order.
    async fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, AdapterError>;

    /// Ordered view of every attached element.
    async fn dom_view(&self) -> Result<DomView, AdapterError>;
    async fn describe(&self, node: NodeId) -> Result<ElementInfo, AdapterError>;
    async fn active_element(&self) -> Result<Option<NodeId>, AdapterError>;

    async fn focus(&self, node: NodeId) -> Result<(), AdapterError>;
    async fn blur(&self, node: NodeId) -> Result<(), AdapterError>;
    async fn scroll_into_view(&self, node: NodeId) -> Result<(), AdapterError>;
    async fn click(&self, node: NodeId) -> Result<(), AdapterError>;

    async fn value(&self, node: NodeId) -> Result<String, AdapterError>;
    async fn set_value(&self, node: NodeId, value: &str) -> Result<(), AdapterError>;
    async fn set_checked(&self, node: NodeId, checked: bool) -> Result<(), AdapterError>;
    async fn select_option(&self, node: NodeId, value: &str) -> Result<(), AdapterError>;

    /// Removes every child of a content-editable node.
    async fn clear_content(&self, node: NodeId) -> Result<(), AdapterError>;
    /// Inserts text at the caret of a content-editable node without replacing its subtree.
    async fn insert_text(&self, node: NodeId, text: &str) -> Result<(), AdapterError>;
    async fn text_content(&self, node: NodeId) -> Result<String, AdapterError>;

    async fn dispatch_event(&self, node: NodeId, event: DomEvent) -> Result<(), AdapterError>;

    /// Inner document of an iframe; cross-origin frames fail with `AccessDenied`.
    async fn frame_document(&self, node: NodeId) -> Result<Arc<dyn PageDocument>, AdapterError>;
    async fn submit_form(&self, node: NodeId) -> Result<(), AdapterError>;
    async fn navigate(&self, url: &str) -> Result<(), AdapterError>;

    async fn body_text(&self) -> Result<String, AdapterError>;
    async fn outer_html(&self) -> Result<String, AdapterError>;
}
