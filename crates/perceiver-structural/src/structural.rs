use async_trait::async_trait;
use page_adapter::{DomView, ElementInfo, PageDocument};
use tracing::debug;
use url::Url;

use crate::api::StructuralPerceiver;
use crate::errors::PerceiverError;
use crate::model::{
    ButtonDigest, FieldDigest, FormDigest, ImageDigest, LinkDigest, PageMeta, PageSnapshot,
};
use crate::policy::SnapshotLimits;
use crate::redact::{field_value, scrub_password_values, truncate_chars};

const DEFAULT_FORM_METHOD: &str = "GET";

#[derive(Clone, Debug, Default)]
pub struct StructuralPerceiverImpl {
    limits: SnapshotLimits,
}

impl StructuralPerceiverImpl {
    pub fn new(limits: SnapshotLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SnapshotLimits {
        &self.limits
    }
}

#[async_trait]
impl StructuralPerceiver for StructuralPerceiverImpl {
    async fn snapshot(&self, document: &dyn PageDocument) -> Result<PageSnapshot, PerceiverError> {
        let url = document.url().await?;
        let title = document.title().await?;
        let view = document.dom_view().await?;
        let text = truncate_chars(&document.body_text().await?, self.limits.text_max_chars);
        let markup = truncate_chars(
            &scrub_password_values(&document.outer_html().await?),
            self.limits.markup_max_chars,
        );

        let base = Url::parse(&url).ok();
        let snapshot = PageSnapshot {
            forms: forms(&view, base.as_ref(), &url),
            links: links(&view, base.as_ref(), self.limits.max_links),
            images: images(&view, base.as_ref(), self.limits.max_images),
            buttons: buttons(&view, self.limits.max_buttons),
            meta: PageMeta {
                description: view.meta_content("description"),
                keywords: view.meta_content("keywords"),
                viewport: view.meta_content("viewport"),
            },
            url,
            title,
            text,
            markup,
        };

        debug!(
            url = %snapshot.url,
            forms = snapshot.forms.len(),
            links = snapshot.links.len(),
            images = snapshot.images.len(),
            buttons = snapshot.buttons.len(),
            "captured page snapshot"
        );
        Ok(snapshot)
    }
}

fn forms(view: &DomView, base: Option<&Url>, page_url: &str) -> Vec<FormDigest> {
    view.by_tag("form")
        .map(|form| {
            let action = match form.attr("action").map(str::trim) {
                Some(raw) if !raw.is_empty() => resolve_url(base, raw),
                _ => page_url.to_string(),
            };
            FormDigest {
                id: non_empty(form.attr("id")),
                action: non_empty(Some(action.as_str())),
                method: form
                    .attr("method")
                    .map(|method| method.trim().to_ascii_uppercase())
                    .filter(|method| !method.is_empty())
                    .unwrap_or_else(|| DEFAULT_FORM_METHOD.to_string()),
                inputs: view
                    .descendants(form.id)
                    .filter(|info| info.is_form_control())
                    .map(field_digest)
                    .collect(),
            }
        })
        .collect()
}

fn field_digest(info: &ElementInfo) -> FieldDigest {
    FieldDigest {
        name: non_empty(info.attr("name")),
        field_type: info.input_type().unwrap_or_else(|| "text".to_string()),
        id: non_empty(info.attr("id")),
        placeholder: non_empty(info.attr("placeholder")),
        value: field_value(info),
    }
}

fn links(view: &DomView, base: Option<&Url>, max: usize) -> Vec<LinkDigest> {
    view.by_tag("a")
        .filter_map(|link| {
            link.attr("href").map(|href| LinkDigest {
                text: link.text.trim().to_string(),
                href: resolve_url(base, href),
            })
        })
        .take(max)
        .collect()
}

fn images(view: &DomView, base: Option<&Url>, max: usize) -> Vec<ImageDigest> {
    view.by_tag("img")
        .filter_map(|image| {
            image.attr("src").map(|src| ImageDigest {
                src: resolve_url(base, src),
                alt: non_empty(image.attr("alt")),
            })
        })
        .take(max)
        .collect()
}

fn buttons(view: &DomView, max: usize) -> Vec<ButtonDigest> {
    view.iter()
        .filter(|info| {
            info.is_tag("button")
                || (info.is_tag("input")
                    && matches!(info.input_type().as_deref(), Some("button" | "submit")))
        })
        .take(max)
        .map(|button| ButtonDigest {
            text: non_empty(Some(button.text.as_str()))
                .or_else(|| non_empty(button.attr("value"))),
            id: non_empty(button.attr("id")),
            button_type: button.input_type(),
        })
        .collect()
}

fn resolve_url(base: Option<&Url>, raw: &str) -> String {
    let raw = raw.trim();
    base.and_then(|base| base.join(raw).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact::PASSWORD_MARKER;
    use page_adapter::HtmlPage;

    const SHOP: &str = r#"<html><head>
        <title>Shop</title>
        <meta name="description" content="Things for sale">
        <meta name="viewport" content="width=device-width">
    </head><body>
        <h1>Welcome</h1>
        <form id="login" action="/session" method="post">
            <input name="user" placeholder="Username" value="ann">
            <input type="password" name="pw" id="pw" value="hunter2">
            <select name="lang"><option value="en">English</option></select>
            <button type="submit">Sign in</button>
        </form>
        <form><textarea name="note"></textarea></form>
        <a href="/cart">  Cart </a>
        <a name="anchor-only">skip</a>
        <img src="logo.png" alt="Logo"><img alt="no source">
        <input type="button" value="Help">
        <script>var secret = 1;</script>
    </body></html>"#;

    fn page() -> HtmlPage {
        HtmlPage::parse(SHOP).with_url("https://shop.example/products/")
    }

    #[tokio::test]
    async fn digests_forms_links_and_meta() {
        let page = page();
        let snapshot = StructuralPerceiverImpl::default().snapshot(&page).await.unwrap();

        assert_eq!(snapshot.title, "Shop");
        assert_eq!(snapshot.forms.len(), 2);

        let login = &snapshot.forms[0];
        assert_eq!(login.id.as_deref(), Some("login"));
        assert_eq!(login.action.as_deref(), Some("https://shop.example/session"));
        assert_eq!(login.method, "POST");
        let types: Vec<_> = login.inputs.iter().map(|f| f.field_type.as_str()).collect();
        assert_eq!(types, vec!["text", "password", "select-one"]);
        assert_eq!(login.inputs[0].value.as_deref(), Some("ann"));
        assert_eq!(login.inputs[0].placeholder.as_deref(), Some("Username"));
        assert_eq!(login.inputs[2].value.as_deref(), Some("en"));

        let note = &snapshot.forms[1];
        assert_eq!(note.method, "GET");
        assert_eq!(note.action.as_deref(), Some("https://shop.example/products/"));
        assert_eq!(note.inputs[0].value, None);

        assert_eq!(snapshot.links.len(), 1);
        assert_eq!(snapshot.links[0].text, "Cart");
        assert_eq!(snapshot.links[0].href, "https://shop.example/cart");
        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[0].src, "https://shop.example/products/logo.png");

        let buttons: Vec<_> = snapshot
            .buttons
            .iter()
            .map(|b| (b.text.as_deref(), b.button_type.as_deref()))
            .collect();
        assert_eq!(
            buttons,
            vec![(Some("Sign in"), Some("submit")), (Some("Help"), Some("button"))]
        );

        assert_eq!(snapshot.meta.description.as_deref(), Some("Things for sale"));
        assert_eq!(snapshot.meta.keywords, None);
        assert!(!snapshot.text.contains("secret"));
    }

    #[tokio::test]
    async fn password_values_never_leak() {
        let page = page();
        let pw = page.select_first("#pw").unwrap();
        page.set_value(pw, "typed-later").await.unwrap();

        let snapshot = StructuralPerceiverImpl::default().snapshot(&page).await.unwrap();

        assert_eq!(snapshot.forms[0].inputs[1].value.as_deref(), Some(PASSWORD_MARKER));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("typed-later"));
    }

    #[tokio::test]
    async fn framed_password_values_never_leak() {
        let page = HtmlPage::parse(
            r#"<html><body><iframe srcdoc="<form><input type='password' value='hunter2'></form>"></iframe></body></html>"#,
        )
        .with_url("https://site.example/");

        let snapshot = StructuralPerceiverImpl::default().snapshot(&page).await.unwrap();

        assert!(!snapshot.markup.contains("hunter2"), "{}", snapshot.markup);
        assert!(snapshot.markup.contains(PASSWORD_MARKER));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[tokio::test]
    async fn caps_bound_every_list_and_text() {
        let links: String = (0..30).map(|i| format!(r#"<a href="/p/{i}">item {i}</a>"#)).collect();
        let page = HtmlPage::parse(format!("<html><body><p>{}</p>{links}</body></html>", "ü".repeat(50)));
        let perceiver = StructuralPerceiverImpl::new(SnapshotLimits {
            text_max_chars: 10,
            markup_max_chars: 40,
            max_links: 3,
            ..SnapshotLimits::default()
        });

        let snapshot = perceiver.snapshot(&page).await.unwrap();

        assert_eq!(snapshot.text.chars().count(), 10);
        assert_eq!(snapshot.markup.chars().count(), 40);
        assert_eq!(snapshot.links.len(), 3);
        assert_eq!(snapshot.links[2].text, "item 2");
    }

    #[tokio::test]
    async fn extraction_is_read_only() {
        let page = page();
        StructuralPerceiverImpl::default().snapshot(&page).await.unwrap();
        StructuralPerceiverImpl::default().snapshot(&page).await.unwrap();
        assert_eq!(page.mutation_count(), 0);
        assert!(page.events().is_empty());
    }
}
