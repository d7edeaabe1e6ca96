//! Engine facade
//!
//! Wires one resolver, step executor, runner, form filler and perceiver together and exposes
//! the operations a host calls against its active page.

use action_flow::{
    ActionPlan, ActionStep, DefaultStepExecutor, ExecutionReport, FormFillReport,
    FormFillRequest, FormFiller, NavigationOutcome, StepOutcome, TemplateCatalog, WorkflowRunner,
};
use action_locator::{DefaultElementResolver, ElementResolver, LocatorHint};
use action_primitives::NavigationTarget;
use page_adapter::PageDocument;
use perceiver_structural::{PageSnapshot, StructuralPerceiver, StructuralPerceiverImpl};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::config::PilotConfig;
use crate::errors::PilotError;

pub struct Engine {
    runner: WorkflowRunner,
    forms: FormFiller,
    perceiver: StructuralPerceiverImpl,
}

impl Engine {
    pub fn new(config: &PilotConfig, catalog: TemplateCatalog) -> Self {
        let resolver: Arc<dyn ElementResolver> = Arc::new(DefaultElementResolver::new());
        let executor = DefaultStepExecutor::new(resolver.clone(), config.timing.clone());
        Self {
            runner: WorkflowRunner::new(Arc::new(catalog), Arc::new(executor)),
            forms: FormFiller::new(resolver, config.timing.clone()),
            perceiver: StructuralPerceiverImpl::new(config.snapshot.clone()),
        }
    }

    /// Engine with the configured template catalog.
    pub fn from_config(config: &PilotConfig) -> Result<Self, PilotError> {
        Ok(Self::new(config, config.template_catalog()?))
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        self.runner.catalog()
    }

    pub async fn run(&self, document: &Arc<dyn PageDocument>, plan: &ActionPlan) -> ExecutionReport {
        self.runner.execute(document, plan).await
    }

    /// Runs `execute_workflow` call arguments; malformed arguments yield a failed report.
    pub async fn run_call(&self, document: &Arc<dyn PageDocument>, args: &Value) -> ExecutionReport {
        match ActionPlan::from_call_args(args) {
            Ok(plan) => self.run(document, &plan).await,
            Err(err) => {
                let name = args
                    .get("workflow_type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                warn!(workflow = name, "Rejected workflow arguments: {}", err);
                ExecutionReport::new(name).with_error(err.to_string()).finish()
            }
        }
    }

    pub async fn click_element(
        &self,
        document: &Arc<dyn PageDocument>,
        hint: LocatorHint,
        wait_after_ms: u64,
    ) -> StepOutcome {
        let label = format!("Click {hint}");
        let step = ActionStep::click(hint, label).with_delay(wait_after_ms);
        self.runner.run_single(document, &step).await
    }

    pub async fn type_text(
        &self,
        document: &Arc<dyn PageDocument>,
        hint: LocatorHint,
        text: &str,
        clear_first: bool,
    ) -> StepOutcome {
        let label = format!("Type into {hint}");
        let step = ActionStep::type_text(Some(hint), text, label)
            .with_clear_first(clear_first)
            .with_delay(0);
        self.runner.run_single(document, &step).await
    }

    pub async fn type_into_active_element(
        &self,
        document: &Arc<dyn PageDocument>,
        text: &str,
    ) -> StepOutcome {
        let step = ActionStep::type_text(
            Some(LocatorHint::ActiveElement),
            text,
            "Type into focused element",
        )
        .with_delay(0);
        self.runner.run_single(document, &step).await
    }

    pub async fn fill_form(
        &self,
        document: &Arc<dyn PageDocument>,
        request: &FormFillRequest,
    ) -> FormFillReport {
        self.forms.fill(document, request).await
    }

    pub async fn open(
        &self,
        document: &Arc<dyn PageDocument>,
        target: &NavigationTarget,
    ) -> Result<NavigationOutcome, PilotError> {
        Ok(self.runner.open(document, target).await?)
    }

    pub async fn snapshot(&self, document: &dyn PageDocument) -> Result<PageSnapshot, PilotError> {
        Ok(self.perceiver.snapshot(document).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_flow::StepStatus;
    use action_primitives::Tempo;
    use page_adapter::HtmlPage;
    use serde_json::json;

    const SIGNUP: &str = r#"<html><body>
        <form action="/join">
            <label for="email">Email</label><input id="email" name="email">
            <input type="checkbox" name="terms">
        </form>
        <button id="go">Go</button>
    </body></html>"#;

    fn engine() -> Engine {
        let config = PilotConfig {
            timing: Tempo::immediate(),
            ..PilotConfig::default()
        };
        Engine::new(&config, TemplateCatalog::builtin())
    }

    fn load() -> (Arc<HtmlPage>, Arc<dyn PageDocument>) {
        let page = Arc::new(HtmlPage::parse(SIGNUP).with_url("https://site.example/"));
        let document: Arc<dyn PageDocument> = page.clone();
        (page, document)
    }

    #[test]
    fn click_element_labels_with_the_hint() {
        let (_, document) = load();
        let outcome = tokio_test::block_on(engine().click_element(
            &document,
            LocatorHint::query("#go"),
            0,
        ));
        assert_eq!(outcome.status, StepStatus::Success);
        assert_eq!(outcome.label, "Click #go");
    }

    #[tokio::test]
    async fn type_text_replaces_when_asked() {
        let (page, document) = load();
        let engine = engine();
        let email = page.select_first("#email").unwrap();
        document.set_value(email, "old").await.unwrap();

        let outcome = engine
            .type_text(&document, LocatorHint::query("Email"), "ann@site.example", true)
            .await;

        assert!(outcome.status.is_success(), "{outcome}");
        assert_eq!(document.value(email).await.unwrap(), "ann@site.example");
    }

    #[tokio::test]
    async fn unknown_workflow_touches_nothing() {
        let (page, document) = load();
        let report = engine()
            .run_call(&document, &json!({"workflow_type": "mystery", "text_content": "x"}))
            .await;

        assert!(!report.success);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.error.as_deref(), Some("Unknown workflow type: mystery"));
        assert_eq!(page.mutation_count(), 0);
    }

    #[tokio::test]
    async fn malformed_call_arguments_fail_the_report() {
        let (_, document) = load();
        let report = engine()
            .run_call(&document, &json!({"workflow_type": "custom_workflow", "custom_steps": "click"}))
            .await;

        assert!(!report.success);
        assert_eq!(report.workflow_name, "custom_workflow");
        assert!(report.error.is_some());
    }

    #[tokio::test]
    async fn open_moves_the_page() {
        let (_, document) = load();
        let outcome = engine()
            .open(&document, &NavigationTarget::GoogleSearch("pagepilot".into()))
            .await
            .unwrap();
        assert!(outcome.url.starts_with("https://www.google.com/search?q=pagepilot"));
        assert!(outcome.follow_up.is_none());
        assert_eq!(document.url().await.unwrap(), outcome.url);
    }

    #[tokio::test]
    async fn snapshot_uses_configured_limits() {
        let (_, document) = load();
        let config = PilotConfig {
            snapshot: perceiver_structural::SnapshotLimits {
                max_buttons: 0,
                ..Default::default()
            },
            ..PilotConfig::default()
        };
        let engine = Engine::new(&config, TemplateCatalog::empty());

        let snapshot = engine.snapshot(document.as_ref()).await.unwrap();

        assert!(snapshot.buttons.is_empty());
        assert_eq!(snapshot.forms[0].action.as_deref(), Some("https://site.example/join"));
    }
}
