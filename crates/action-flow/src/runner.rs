//! Workflow runner: plan expansion, sequential execution, report aggregation

use action_locator::LocatorHint;
use action_primitives::{execute_navigate, settle, ExecCtx, NavigationTarget};
use page_adapter::PageDocument;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::FlowError;
use crate::executor::StepExecutor;
use crate::templates::TemplateCatalog;
use crate::types::{ActionPlan, ActionStep, ExecutionReport, StepOutcome, CUSTOM_WORKFLOW};

/// Result of opening a site or search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationOutcome {
    /// Destination handed to the host
    pub url: String,

    /// Click performed once the destination rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<StepOutcome>,
}

/// Drives a step executor over expanded plans.
///
/// Templates are passed in at construction and never mutated afterwards.
pub struct WorkflowRunner {
    catalog: Arc<TemplateCatalog>,
    executor: Arc<dyn StepExecutor>,
}

impl WorkflowRunner {
    pub fn new(catalog: Arc<TemplateCatalog>, executor: Arc<dyn StepExecutor>) -> Self {
        Self { catalog, executor }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Expand a plan into concrete steps without touching any page.
    pub fn resolve_plan(&self, plan: &ActionPlan) -> Result<Vec<ActionStep>, FlowError> {
        match plan {
            ActionPlan::Template {
                template_name,
                bound_text,
            } => self
                .catalog
                .bind(template_name, bound_text)
                .ok_or_else(|| FlowError::UnknownWorkflow(template_name.clone())),
            ActionPlan::Custom { steps } => {
                if steps.is_empty() {
                    return Err(FlowError::UnknownWorkflow(CUSTOM_WORKFLOW.to_string()));
                }
                for step in steps {
                    step.validate()?;
                }
                Ok(steps.clone())
            }
        }
    }

    /// Execute a plan step by step.
    ///
    /// Step failures are recorded and the sequence continues. Only a plan that cannot be
    /// expanded yields `success == false`, and then no step runs.
    pub async fn execute(
        &self,
        document: &Arc<dyn PageDocument>,
        plan: &ActionPlan,
    ) -> ExecutionReport {
        let workflow = plan.workflow_name().to_string();
        let report = ExecutionReport::new(workflow.clone());

        let steps = match self.resolve_plan(plan) {
            Ok(steps) => steps,
            Err(err) => {
                warn!(workflow = %workflow, "Workflow rejected: {}", err);
                return report.with_error(err.to_string()).finish();
            }
        };

        info!(workflow = %workflow, steps = steps.len(), "Executing workflow");

        let mut report = report;
        for (index, step) in steps.iter().enumerate() {
            debug!("Executing step {}/{}", index + 1, steps.len());
            let outcome = self.executor.run_step(document, index, step).await;
            report = report.with_outcome(outcome);
        }

        let report = report.with_success().finish();
        info!(
            workflow = %workflow,
            steps_executed = report.steps_executed,
            succeeded = report.succeeded_steps(),
            latency_ms = report.latency_ms,
            "Workflow completed"
        );
        report
    }

    /// Run one step outside any workflow.
    pub async fn run_single(
        &self,
        document: &Arc<dyn PageDocument>,
        step: &ActionStep,
    ) -> StepOutcome {
        self.executor.run_step(document, 0, step).await
    }

    /// Navigate to a site or search, then perform the target's follow-up click if it has one.
    pub async fn open(
        &self,
        document: &Arc<dyn PageDocument>,
        target: &NavigationTarget,
    ) -> Result<NavigationOutcome, FlowError> {
        let ctx = ExecCtx::new();
        let url = execute_navigate(&ctx, document.as_ref(), target).await?;

        let follow_up = match target.follow_up() {
            Some(click) => {
                settle(Duration::from_millis(click.settle_ms)).await;
                let step = ActionStep::click(LocatorHint::query(click.selector), "Open first result")
                    .with_delay(0);
                Some(self.run_single(document, &step).await)
            }
            None => None,
        };

        Ok(NavigationOutcome {
            url: url.to_string(),
            follow_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepStatus;
    use async_trait::async_trait;
    use page_adapter::HtmlPage;
    use parking_lot::Mutex;

    /// Records labels and fails any step whose label contains "fail".
    #[derive(Default)]
    struct RecordingExecutor {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StepExecutor for RecordingExecutor {
        async fn run_step(
            &self,
            _document: &Arc<dyn PageDocument>,
            index: usize,
            step: &ActionStep,
        ) -> StepOutcome {
            self.seen.lock().push(step.label.clone());
            let outcome = StepOutcome::new(index, step.label.clone());
            if step.label.contains("fail") {
                outcome.with_failure(StepStatus::NotFound, "missing")
            } else {
                outcome.with_success("ok")
            }
            .finish()
        }
    }

    fn runner() -> (WorkflowRunner, Arc<RecordingExecutor>) {
        let executor = Arc::new(RecordingExecutor::default());
        let runner = WorkflowRunner::new(Arc::new(TemplateCatalog::builtin()), executor.clone());
        (runner, executor)
    }

    fn blank() -> (Arc<HtmlPage>, Arc<dyn PageDocument>) {
        let page = Arc::new(HtmlPage::parse("<html><body></body></html>"));
        let document: Arc<dyn PageDocument> = page.clone();
        (page, document)
    }

    #[tokio::test]
    async fn template_steps_run_in_order() {
        let (runner, executor) = runner();
        let (_, document) = blank();

        for name in runner.catalog().names() {
            let expected = runner.catalog().get(name).unwrap().steps.len();
            let report = runner
                .execute(&document, &ActionPlan::template(name, "text"))
                .await;
            assert!(report.success);
            assert_eq!(report.steps_executed, expected, "{name}");
            let indexes: Vec<_> = report.outcomes.iter().map(|o| o.index).collect();
            assert_eq!(indexes, (0..expected).collect::<Vec<_>>());
        }
        assert!(!executor.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn unknown_template_touches_nothing() {
        let (runner, executor) = runner();
        let (page, document) = blank();

        let report = runner
            .execute(&document, &ActionPlan::template("tiktok_dance", "x"))
            .await;

        assert!(!report.success);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.error.as_deref(), Some("Unknown workflow type: tiktok_dance"));
        assert!(executor.seen.lock().is_empty());
        assert_eq!(page.mutation_count(), 0);
    }

    #[tokio::test]
    async fn empty_custom_plan_is_unknown() {
        let (runner, _) = runner();
        let err = runner.resolve_plan(&ActionPlan::custom(Vec::new())).unwrap_err();
        assert!(matches!(err, FlowError::UnknownWorkflow(name) if name == CUSTOM_WORKFLOW));
    }

    #[tokio::test]
    async fn malformed_custom_step_fails_before_running() {
        let (runner, executor) = runner();
        let (_, document) = blank();
        let mut click = ActionStep::click(LocatorHint::query("#a"), "first");
        click.locator = None;
        let plan = ActionPlan::custom(vec![ActionStep::wait(1, "wait"), click]);

        let report = runner.execute(&document, &plan).await;

        assert!(!report.success);
        assert_eq!(report.steps_executed, 0);
        assert!(executor.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn failing_step_does_not_stop_the_sequence() {
        let (runner, executor) = runner();
        let (_, document) = blank();
        let plan = ActionPlan::custom(vec![
            ActionStep::click(LocatorHint::query("#one"), "one"),
            ActionStep::click(LocatorHint::query("#two"), "two fail"),
            ActionStep::click(LocatorHint::query("#three"), "three"),
        ]);

        let report = runner.execute(&document, &plan).await;

        assert!(report.success);
        assert_eq!(report.steps_executed, 3);
        assert_eq!(report.outcomes[1].status, StepStatus::NotFound);
        assert!(report.outcomes[2].status.is_success());
        assert_eq!(*executor.seen.lock(), vec!["one", "two fail", "three"]);
        assert_eq!(
            report.summary(),
            "Workflow \"custom_workflow\" completed: 2/3 steps succeeded"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn youtube_play_clicks_first_result() {
        let (runner, executor) = runner();
        let (page, document) = blank();

        let outcome = runner
            .open(&document, &NavigationTarget::YoutubePlay("lofi beats".into()))
            .await
            .unwrap();

        assert!(outcome.url.starts_with("https://www.youtube.com/results?search_query="));
        assert!(outcome.follow_up.is_some());
        assert_eq!(*executor.seen.lock(), vec!["Open first result"]);
        assert_eq!(document.url().await.unwrap(), outcome.url);
        assert_eq!(page.mutation_count(), 1);
    }

    #[tokio::test]
    async fn plain_navigation_has_no_follow_up() {
        let (runner, _) = runner();
        let (_, document) = blank();

        let outcome = runner
            .open(&document, &NavigationTarget::DirectUrl("example.com".into()))
            .await
            .unwrap();

        assert_eq!(outcome.url, "https://example.com/");
        assert!(outcome.follow_up.is_none());
    }
}
