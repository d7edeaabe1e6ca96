use pagepilot_cli::{
    ActionPlan, Engine, FormFillRequest, HtmlPage, LocatorHint, PageDocument, PilotConfig,
    StepStatus, TemplateCatalog, Tempo,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const LOGIN: &str = r#"<html><head><title>Sign in</title></head><body>
    <form id="login" action="/session" method="post">
        <label for="user">Username</label>
        <input id="user" name="username" type="text">
        <input id="pw" name="password" type="password" value="hunter2">
        <label><input type="checkbox" name="remember"> Remember me</label>
        <button type="submit">Sign in</button>
    </form>
</body></html>"#;

fn quick_engine() -> Engine {
    let config = PilotConfig {
        timing: Tempo::immediate(),
        ..PilotConfig::default()
    };
    Engine::new(&config, TemplateCatalog::builtin())
}

fn load(markup: &str) -> (Arc<HtmlPage>, Arc<dyn PageDocument>) {
    let page = Arc::new(HtmlPage::parse(markup).with_url("https://accounts.example/login"));
    let document: Arc<dyn PageDocument> = page.clone();
    (page, document)
}

#[tokio::test(start_paused = true)]
async fn youtube_comment_on_an_empty_page_keeps_its_labels_and_pacing() {
    let engine = Engine::new(&PilotConfig::default(), TemplateCatalog::builtin());
    let (_, document) = load("<html><body><p>no comments here</p></body></html>");

    let started = tokio::time::Instant::now();
    let report = engine
        .run(&document, &ActionPlan::template("youtube_comment", "hello"))
        .await;

    assert!(report.success);
    let labels: Vec<_> = report.outcomes.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Click comment box", "Type comment text", "Click comment button"]
    );
    assert!(report
        .outcomes
        .iter()
        .all(|outcome| outcome.status == StepStatus::NotFound));
    assert!(started.elapsed() >= Duration::from_millis(2500));
}

#[tokio::test]
async fn unknown_workflow_leaves_the_page_alone() {
    let (page, document) = load(LOGIN);

    let report = quick_engine()
        .run(&document, &ActionPlan::template("tiktok_duet", "x"))
        .await;

    assert!(!report.success);
    assert_eq!(report.steps_executed, 0);
    assert_eq!(report.summary(), "Workflow \"tiktok_duet\" failed: Unknown workflow type: tiktok_duet");
    assert_eq!(page.mutation_count(), 0);
    assert!(page.events().is_empty());
}

#[tokio::test]
async fn custom_sequence_continues_past_a_missing_element() {
    let (page, document) = load(LOGIN);
    let call = json!({
        "workflow_type": "custom_workflow",
        "custom_steps": [
            {"action": "click", "selector": "#user", "description": "Focus username"},
            {"action": "click", "selector": "#forgot-password", "description": "Forgot password"},
            {"action": "type", "text": "ann", "description": "Type username"}
        ]
    });

    let report = quick_engine().run_call(&document, &call).await;

    assert!(report.success);
    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Success, StepStatus::NotFound, StepStatus::Success]
    );
    let user = page.select_first("#user").unwrap();
    assert_eq!(document.value(user).await.unwrap(), "ann");
}

#[tokio::test]
async fn snapshots_never_carry_passwords() {
    let (_, document) = load(LOGIN);
    let engine = quick_engine();

    let typed = engine
        .type_text(&document, LocatorHint::query("#pw"), "correct horse", true)
        .await;
    assert!(typed.status.is_success(), "{typed}");

    let snapshot = engine.snapshot(document.as_ref()).await.unwrap();
    let serialized = serde_json::to_string(&snapshot).unwrap();

    assert!(!serialized.contains("hunter2"));
    assert!(!serialized.contains("correct horse"));
    let password = snapshot.forms[0]
        .inputs
        .iter()
        .find(|field| field.field_type == "password")
        .unwrap();
    assert_eq!(password.value.as_deref(), Some("[PASSWORD]"));
}

#[tokio::test]
async fn fill_form_sets_fields_and_submits() {
    let (page, document) = load(LOGIN);
    let request = FormFillRequest::from_json(
        &json!({"Username": "ann", "remember": true, "#captcha": "1234"}),
        true,
    )
    .unwrap();

    let report = quick_engine().fill_form(&document, &request).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.filled, 2);
    assert_eq!(report.outcomes[2].status, StepStatus::NotFound);
    assert!(report.submitted());

    let user = page.select_first("#user").unwrap();
    assert_eq!(document.value(user).await.unwrap(), "ann");
    let form = page.select_first("#login").unwrap();
    assert!(page
        .events_for(form)
        .contains(&page_adapter::DomEvent::Submit));
}

#[tokio::test]
async fn configured_templates_join_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("templates.yaml")).unwrap();
    writeln!(
        file,
        r##"templates:
  - name: login_username
    description: Enter a username
    steps:
      - kind: type
        locator: "#user"
        label: Type username
        delay_ms: 0
"##
    )
    .unwrap();

    let config = PilotConfig::from_yaml_str(
        "templates_path: templates.yaml\ntiming:\n  click_settle_ms: 0\n  blur_delay_ms: 0\n",
    )
    .unwrap()
    .anchored_at(dir.path());
    let engine = Engine::from_config(&config).unwrap();
    assert!(engine.catalog().get("youtube_comment").is_some());

    let (page, document) = load(LOGIN);
    let report = engine
        .run(&document, &ActionPlan::template("login_username", "ann"))
        .await;

    assert_eq!(report.succeeded_steps(), 1, "{:?}", report.outcomes);
    let user = page.select_first("#user").unwrap();
    assert_eq!(document.value(user).await.unwrap(), "ann");
}
