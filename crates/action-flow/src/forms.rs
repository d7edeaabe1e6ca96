//! Form filling on the current page

use action_locator::{DefaultElementResolver, ElementResolver, LocatorHint, ResolveContext};
use action_primitives::{settle, ActionError, ExecCtx, InputOptions, InputSimulator, Tempo};
use page_adapter::PageDocument;
use std::sync::Arc;
use tracing::{info, warn};

use crate::types::{FieldValue, FormFillReport, FormFillRequest, StepOutcome, StepStatus};

/// Fills fields one by one and optionally submits the first form.
pub struct FormFiller {
    resolver: Arc<dyn ElementResolver>,
    simulator: InputSimulator,
    tempo: Tempo,
}

impl FormFiller {
    pub fn new(resolver: Arc<dyn ElementResolver>, tempo: Tempo) -> Self {
        Self {
            resolver,
            simulator: InputSimulator::new(tempo.clone()),
            tempo,
        }
    }

    pub fn with_tempo(tempo: Tempo) -> Self {
        Self::new(Arc::new(DefaultElementResolver::new()), tempo)
    }

    pub async fn fill(
        &self,
        document: &Arc<dyn PageDocument>,
        request: &FormFillRequest,
    ) -> FormFillReport {
        let ctx = ExecCtx::new();
        info!(
            action_id = %ctx.action_id,
            fields = request.fields.len(),
            submit = request.submit,
            "Filling form"
        );

        let mut outcomes = Vec::with_capacity(request.fields.len());
        let mut filled = 0;
        for (index, (hint, value)) in request.fields.iter().enumerate() {
            let outcome = StepOutcome::new(index, hint.to_string());
            let outcome = match self.fill_field(&ctx, document, hint, value).await {
                Ok((true, detail)) => {
                    filled += 1;
                    outcome.with_success(detail)
                }
                Ok((false, detail)) => outcome.with_success(detail),
                Err(err) => {
                    warn!(action_id = %ctx.action_id, field = %hint, "Field not filled: {}", err);
                    outcome.with_failure(StepStatus::for_error(&err), err.to_string())
                }
            };
            outcomes.push(outcome.finish());
        }

        let submission = if request.submit && filled > 0 {
            settle(self.tempo.submit_settle()).await;
            Some(self.submit_first_form(document.as_ref(), outcomes.len()).await)
        } else {
            None
        };

        let report = FormFillReport {
            outcomes,
            filled,
            total: request.fields.len(),
            submission,
        };
        info!(action_id = %ctx.action_id, "{}", report.summary());
        report
    }

    async fn fill_field(
        &self,
        ctx: &ExecCtx,
        document: &Arc<dyn PageDocument>,
        hint: &LocatorHint,
        value: &FieldValue,
    ) -> Result<(bool, String), ActionError> {
        let resolution = self
            .resolver
            .resolve(document.as_ref(), hint, &ResolveContext::default())
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    ActionError::AnchorNotFound(format!("Field not found: {hint}"))
                } else {
                    ActionError::Internal(err.to_string())
                }
            })?;

        let applied = self
            .simulator
            .apply(
                ctx,
                document,
                resolution.node,
                &value.to_payload(),
                InputOptions::clear_first(),
            )
            .await?;
        Ok((applied.changed, applied.detail))
    }

    async fn submit_first_form(&self, document: &dyn PageDocument, index: usize) -> StepOutcome {
        let outcome = StepOutcome::new(index, "Submit form");
        let forms = match document.query_selector_all("form").await {
            Ok(forms) => forms,
            Err(err) => {
                let err = ActionError::from(err);
                return outcome
                    .with_failure(StepStatus::for_error(&err), err.to_string())
                    .finish();
            }
        };

        match forms.first() {
            Some(form) => match document.submit_form(*form).await {
                Ok(()) => outcome.with_success("Form submitted"),
                Err(err) => {
                    let err = ActionError::from(err);
                    outcome.with_failure(StepStatus::for_error(&err), err.to_string())
                }
            },
            None => outcome.with_failure(StepStatus::NotFound, "No form found to submit"),
        }
        .finish()
    }
}
