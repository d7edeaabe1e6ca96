//! Step executor implementation

use action_locator::{
    DefaultElementResolver, ElementResolver, LocatorError, LocatorHint, ResolveContext,
};
use action_primitives::{
    execute_click, settle, ActionError, ExecCtx, InputOptions, InputPayload, InputSimulator, Tempo,
};
use async_trait::async_trait;
use page_adapter::{DomView, NodeId, PageDocument};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::types::{ActionStep, StepKind, StepOutcome, StepStatus};

/// Step executor trait
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Run one step against the document.
    ///
    /// Never fails: every error is folded into the returned outcome. The post-step settle
    /// delay has elapsed by the time this returns.
    async fn run_step(
        &self,
        document: &Arc<dyn PageDocument>,
        index: usize,
        step: &ActionStep,
    ) -> StepOutcome;
}

/// Default step executor implementation
pub struct DefaultStepExecutor {
    resolver: Arc<dyn ElementResolver>,
    simulator: InputSimulator,
    tempo: Tempo,
}

impl Default for DefaultStepExecutor {
    fn default() -> Self {
        Self::with_tempo(Tempo::default())
    }
}

impl DefaultStepExecutor {
    /// Create a new step executor
    pub fn new(resolver: Arc<dyn ElementResolver>, tempo: Tempo) -> Self {
        Self {
            resolver,
            simulator: InputSimulator::new(tempo.clone()),
            tempo,
        }
    }

    /// Executor with the full resolver chain
    pub fn with_tempo(tempo: Tempo) -> Self {
        Self::new(Arc::new(DefaultElementResolver::new()), tempo)
    }

    pub fn tempo(&self) -> &Tempo {
        &self.tempo
    }

    fn post_step_delay(&self, step: &ActionStep) -> Duration {
        step.delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.tempo.default_step_delay())
    }

    async fn perform(
        &self,
        ctx: &ExecCtx,
        document: &Arc<dyn PageDocument>,
        step: &ActionStep,
    ) -> Result<String, ActionError> {
        match step.kind {
            StepKind::Click => self.click(ctx, document.as_ref(), step).await,
            StepKind::Type => self.type_text(ctx, document, step).await,
            StepKind::Wait => {
                let delay = step.delay_ms.unwrap_or(0);
                settle(Duration::from_millis(delay)).await;
                Ok(format!("Waited {delay}ms"))
            }
        }
    }

    async fn click(
        &self,
        ctx: &ExecCtx,
        document: &dyn PageDocument,
        step: &ActionStep,
    ) -> Result<String, ActionError> {
        let hint = step
            .locator
            .as_ref()
            .ok_or_else(|| ActionError::InvalidInput("click step has no locator".to_string()))?;

        let context = ResolveContext::with_purpose(step.label.clone());
        let resolution = self
            .resolver
            .resolve(document, hint, &context)
            .await
            .map_err(|err| resolution_error(err, &step.label))?;

        debug!(
            action_id = %ctx.action_id,
            strategy = %resolution.strategy,
            node = %resolution.node,
            "click target resolved"
        );
        execute_click(ctx, document, resolution.node, self.tempo.click_settle()).await?;
        Ok(format!("Clicked: {}", step.label))
    }

    async fn type_text(
        &self,
        ctx: &ExecCtx,
        document: &Arc<dyn PageDocument>,
        step: &ActionStep,
    ) -> Result<String, ActionError> {
        let text = step
            .text
            .as_deref()
            .ok_or_else(|| ActionError::InvalidInput("type step has no text".to_string()))?;

        let node = match &step.locator {
            Some(hint @ LocatorHint::Query(_)) => {
                self.resolver
                    .resolve(document.as_ref(), hint, &ResolveContext::default())
                    .await
                    .map_err(|err| resolution_error(err, &hint.to_string()))?
                    .node
            }
            Some(LocatorHint::ActiveElement) | None => self.focused_text_target(document).await?,
        };

        let options = InputOptions {
            clear_first: step.clear_first,
        };
        let applied = self
            .simulator
            .apply(ctx, document, node, &InputPayload::text(text), options)
            .await?;
        Ok(applied.detail)
    }

    /// The focused element when it takes text, else the last text target in the document.
    async fn focused_text_target(
        &self,
        document: &Arc<dyn PageDocument>,
    ) -> Result<NodeId, ActionError> {
        let view = document.dom_view().await?;

        match self
            .resolver
            .resolve(
                document.as_ref(),
                &LocatorHint::ActiveElement,
                &ResolveContext::default(),
            )
            .await
        {
            Ok(resolution)
                if view
                    .get(resolution.node)
                    .map(|info| info.accepts_text())
                    .unwrap_or(false) =>
            {
                return Ok(resolution.node);
            }
            Ok(_) => debug!("focused element does not accept text"),
            Err(err) if err.is_not_found() => debug!("no focused element"),
            Err(err) => return Err(locator_error(err)),
        }

        last_text_target(&view)
            .ok_or_else(|| ActionError::AnchorNotFound("No text input found for typing".to_string()))
    }
}

/// Most recently rendered text field or editing host.
fn last_text_target(view: &DomView) -> Option<NodeId> {
    view.iter()
        .filter(|info| {
            info.is_text_like()
                || (info.content_editable
                    && !info.is_iframe()
                    && !info
                        .parent
                        .and_then(|parent| view.get(parent))
                        .map(|parent| parent.content_editable)
                        .unwrap_or(false))
        })
        .map(|info| info.id)
        .last()
}

fn resolution_error(err: LocatorError, target: &str) -> ActionError {
    if err.is_not_found() {
        ActionError::AnchorNotFound(format!("Element not found for: {target}"))
    } else {
        locator_error(err)
    }
}

fn locator_error(err: LocatorError) -> ActionError {
    match err {
        LocatorError::Adapter(adapter) => ActionError::from(adapter),
        LocatorError::InvalidHint(reason) => ActionError::InvalidInput(reason),
        other => ActionError::Internal(other.to_string()),
    }
}

#[async_trait]
impl StepExecutor for DefaultStepExecutor {
    async fn run_step(
        &self,
        document: &Arc<dyn PageDocument>,
        index: usize,
        step: &ActionStep,
    ) -> StepOutcome {
        let ctx = ExecCtx::new();
        info!(
            action_id = %ctx.action_id,
            step = index + 1,
            kind = %step.kind,
            label = %step.label,
            "Executing step"
        );

        let outcome = StepOutcome::new(index, step.label.clone());
        let outcome = match self.perform(&ctx, document, step).await {
            Ok(detail) => {
                info!(action_id = %ctx.action_id, step = index + 1, "Step succeeded");
                outcome.with_success(detail)
            }
            Err(err) => {
                warn!(
                    action_id = %ctx.action_id,
                    step = index + 1,
                    severity = err.severity(),
                    "Step failed: {}",
                    err
                );
                outcome.with_failure(StepStatus::for_error(&err), err.to_string())
            }
        }
        .finish();

        settle(self.post_step_delay(step)).await;
        outcome
    }
}
