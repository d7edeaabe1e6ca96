use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use page_adapter::{HtmlPage, PageDocument};
use tokio::fs;
use tracing::debug;
use url::Url;

/// Loads an HTML file as the page to operate on.
///
/// The page reports `url` when given, otherwise the file's own `file://` URL.
pub async fn load_page(path: &Path, url: Option<&str>) -> Result<Arc<dyn PageDocument>> {
    let markup = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read page {}", path.display()))?;

    let url = match url {
        Some(raw) => Url::parse(raw).with_context(|| format!("Invalid page URL: {raw}"))?,
        None => {
            let absolute = fs::canonicalize(path)
                .await
                .with_context(|| format!("Failed to resolve {}", path.display()))?;
            Url::from_file_path(&absolute).map_err(|_| {
                anyhow::anyhow!("Cannot express {} as a file URL", absolute.display())
            })?
        }
    };

    debug!(path = %path.display(), url = %url, bytes = markup.len(), "Loaded page");
    Ok(Arc::new(HtmlPage::parse(markup).with_url(url.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn file_pages_report_a_file_url() {
        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        write!(file, "<html><head><title>Local</title></head><body></body></html>").unwrap();

        let page = load_page(file.path(), None).await.unwrap();

        assert_eq!(page.title().await.unwrap(), "Local");
        assert!(page.url().await.unwrap().starts_with("file://"));
    }

    #[tokio::test]
    async fn explicit_url_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html><body></body></html>").unwrap();

        let page = load_page(file.path(), Some("https://site.example/a"))
            .await
            .unwrap();

        assert_eq!(page.url().await.unwrap(), "https://site.example/a");
    }
}
