use page_adapter::{HtmlPage, PageDocument};
use perceiver_structural::{redact::PASSWORD_MARKER, StructuralPerceiver, StructuralPerceiverImpl};

const SIGN_IN: &str = r#"<html><head><title>Sign in</title></head><body>
    <form action="https://auth.example/login">
        <input type="email" name="email" value="ann@example.com">
        <input type="PASSWORD" name="secret" value="correct horse">
        <input type="password" name="empty">
        <input type="submit" value="Go">
    </form>
    <iframe src="https://ads.example/frame"></iframe>
</body></html>"#;

#[tokio::test]
async fn every_password_field_is_redacted() {
    let page = HtmlPage::parse(SIGN_IN).with_url("https://auth.example/");
    let perceiver = StructuralPerceiverImpl::default();

    let snapshot = perceiver.snapshot(&page).await.unwrap();

    let fields = &snapshot.forms[0].inputs;
    assert_eq!(fields[0].value.as_deref(), Some("ann@example.com"));
    assert_eq!(fields[1].value.as_deref(), Some(PASSWORD_MARKER));
    assert_eq!(fields[2].value.as_deref(), Some(PASSWORD_MARKER));
    assert!(!snapshot.markup.contains("correct horse"));
    assert!(snapshot.markup.contains(PASSWORD_MARKER));
    assert_eq!(snapshot.buttons[0].text.as_deref(), Some("Go"));
}

#[tokio::test]
async fn snapshots_are_rebuilt_from_live_state() {
    let page = HtmlPage::parse(SIGN_IN).with_url("https://auth.example/");
    let perceiver = StructuralPerceiverImpl::default();
    let first = perceiver.snapshot(&page).await.unwrap();

    let email = page.select_first("input[name=email]").unwrap();
    page.set_value(email, "bob@example.com").await.unwrap();
    let second = perceiver.snapshot(&page).await.unwrap();

    assert_eq!(first.forms[0].inputs[0].value.as_deref(), Some("ann@example.com"));
    assert_eq!(second.forms[0].inputs[0].value.as_deref(), Some("bob@example.com"));
    assert_eq!(first.markup, second.markup);
}
