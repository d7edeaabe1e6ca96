//! Input simulator - mutate an element and emit the events a bound page expects

use page_adapter::{DomEvent, ElementInfo, NodeId, PageDocument};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    errors::ActionError,
    types::{AppliedInput, ExecCtx, InputOptions, InputPayload, TargetKind},
    waiting::{settle, Tempo},
};

/// Default `value` of a radio without one.
const RADIO_DEFAULT_VALUE: &str = "on";

/// Applies payloads to resolved elements.
///
/// Dispatch follows element capability in this order: content-editable, checkbox, radio,
/// select, text-like field, iframe. Anything else is rejected as unsupported.
#[derive(Clone, Debug, Default)]
pub struct InputSimulator {
    tempo: Tempo,
}

impl InputSimulator {
    pub fn new(tempo: Tempo) -> Self {
        Self { tempo }
    }

    pub fn tempo(&self) -> &Tempo {
        &self.tempo
    }

    pub async fn apply(
        &self,
        ctx: &ExecCtx,
        document: &Arc<dyn PageDocument>,
        node: NodeId,
        payload: &InputPayload,
        options: InputOptions,
    ) -> Result<AppliedInput, ActionError> {
        let info = document.describe(node).await?;

        info!(
            action_id = %ctx.action_id,
            node = %node,
            tag = %info.tag,
            text_length = payload.text_len(),
            clear_first = options.clear_first,
            "Applying input"
        );

        if info.content_editable && !info.is_iframe() {
            let text = require_text(payload, &info)?;
            return type_content_editable(document.as_ref(), node, text, options).await;
        }
        if info.is_checkbox() {
            return self.toggle_checkbox(document.as_ref(), node, &info, payload).await;
        }
        if info.is_radio() {
            return self.check_radio(document.as_ref(), node, &info, payload).await;
        }
        if info.is_select() {
            return self.choose_option(document.as_ref(), node, payload).await;
        }
        if info.is_text_like() {
            let text = require_text(payload, &info)?;
            return self
                .type_text_field(document, node, &info, text, options)
                .await;
        }
        if info.is_iframe() {
            let text = require_text(payload, &info)?;
            return type_into_frame(document.as_ref(), node, text, options).await;
        }

        Err(ActionError::UnsupportedElement(format!(
            "<{}> cannot accept input",
            info.tag
        )))
    }

    async fn type_text_field(
        &self,
        document: &Arc<dyn PageDocument>,
        node: NodeId,
        info: &ElementInfo,
        text: &str,
        options: InputOptions,
    ) -> Result<AppliedInput, ActionError> {
        document.focus(node).await?;
        let next = if options.clear_first {
            text.to_string()
        } else {
            format!("{}{}", info.value, text)
        };
        document.set_value(node, &next).await?;
        for event in [
            DomEvent::KeyDown,
            DomEvent::Input,
            DomEvent::KeyUp,
            DomEvent::Change,
        ] {
            document.dispatch_event(node, event).await?;
        }
        self.schedule_blur(document, node);

        Ok(AppliedInput::changed(
            TargetKind::TextField,
            format!("Typed {} characters into <{}>", text.chars().count(), info.tag),
        ))
    }

    /// Let validation handlers see a blur shortly after typing.
    fn schedule_blur(&self, document: &Arc<dyn PageDocument>, node: NodeId) {
        let document = Arc::clone(document);
        let delay = self.tempo.blur_delay();
        tokio::spawn(async move {
            settle(delay).await;
            if let Err(err) = document.blur(node).await {
                debug!(node = %node, "deferred blur skipped: {}", err);
            }
        });
    }

    async fn toggle_checkbox(
        &self,
        document: &dyn PageDocument,
        node: NodeId,
        info: &ElementInfo,
        payload: &InputPayload,
    ) -> Result<AppliedInput, ActionError> {
        let desired = payload.is_truthy();
        document.set_checked(node, desired).await?;
        document.dispatch_event(node, DomEvent::Change).await?;
        let detail = if desired { "Checked" } else { "Unchecked" };
        Ok(AppliedInput {
            kind: TargetKind::Checkbox,
            changed: info.checked != desired,
            detail: detail.to_string(),
        })
    }

    async fn check_radio(
        &self,
        document: &dyn PageDocument,
        node: NodeId,
        info: &ElementInfo,
        payload: &InputPayload,
    ) -> Result<AppliedInput, ActionError> {
        let own_value = info.attr("value").unwrap_or(RADIO_DEFAULT_VALUE);
        let matches = payload.checked == Some(true) || payload.value() == Some(own_value);
        if !matches {
            return Ok(AppliedInput::unchanged(
                TargetKind::Radio,
                format!("Radio value '{own_value}' does not match"),
            ));
        }
        document.set_checked(node, true).await?;
        document.dispatch_event(node, DomEvent::Change).await?;
        Ok(AppliedInput::changed(
            TargetKind::Radio,
            format!("Selected radio '{own_value}'"),
        ))
    }

    async fn choose_option(
        &self,
        document: &dyn PageDocument,
        node: NodeId,
        payload: &InputPayload,
    ) -> Result<AppliedInput, ActionError> {
        let value = payload
            .value()
            .ok_or_else(|| ActionError::InvalidInput("select needs an option value".to_string()))?;
        document.select_option(node, value).await?;
        document.dispatch_event(node, DomEvent::Change).await?;
        Ok(AppliedInput::changed(
            TargetKind::Select,
            format!("Selected option '{value}'"),
        ))
    }
}

fn require_text<'a>(payload: &'a InputPayload, info: &ElementInfo) -> Result<&'a str, ActionError> {
    payload.text.as_deref().ok_or_else(|| {
        ActionError::InvalidInput(format!("<{}> needs text to type", info.tag))
    })
}

/// Caret insertion keeps the surrounding framework-managed markup intact.
async fn type_content_editable(
    document: &dyn PageDocument,
    node: NodeId,
    text: &str,
    options: InputOptions,
) -> Result<AppliedInput, ActionError> {
    document.focus(node).await?;
    if options.clear_first {
        document.clear_content(node).await?;
    }
    document.insert_text(node, text).await?;
    document.dispatch_event(node, DomEvent::Input).await?;
    Ok(AppliedInput::changed(
        TargetKind::ContentEditable,
        format!("Inserted {} characters", text.chars().count()),
    ))
}

async fn type_into_frame(
    document: &dyn PageDocument,
    node: NodeId,
    text: &str,
    options: InputOptions,
) -> Result<AppliedInput, ActionError> {
    let frame = document.frame_document(node).await?;
    let view = frame.dom_view().await?;
    let body = view
        .body()
        .filter(|body| body.content_editable)
        .map(|body| body.id)
        .ok_or_else(|| {
            ActionError::UnsupportedElement("frame body is not editable".to_string())
        })?;
    type_content_editable(frame.as_ref(), body, text, options).await?;
    Ok(AppliedInput::changed(
        TargetKind::Frame,
        format!("Inserted {} characters into frame", text.chars().count()),
    ))
}
