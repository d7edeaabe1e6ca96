//! Navigate primitive - build a destination and hand it to the host

use page_adapter::PageDocument;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::{errors::ActionError, types::ExecCtx};

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const YOUTUBE_RESULTS_URL: &str = "https://www.youtube.com/results";

/// First result link on a YouTube results page.
pub const YOUTUBE_FIRST_VIDEO_SELECTOR: &str = "a#video-title";

/// Time the results page gets to render before the first video is clicked.
pub const YOUTUBE_PLAY_SETTLE_MS: u64 = 2000;

/// Where a navigation request should land
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action_type", content = "query", rename_all = "snake_case")]
pub enum NavigationTarget {
    DirectUrl(String),
    GoogleSearch(String),
    YoutubeSearch(String),
    /// Search, then open the first result
    YoutubePlay(String),
}

/// Click to perform once the destination has rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowUpClick {
    pub selector: &'static str,
    pub settle_ms: u64,
}

impl NavigationTarget {
    pub fn destination(&self) -> Result<Url, ActionError> {
        match self {
            NavigationTarget::DirectUrl(raw) => {
                let raw = raw.trim();
                let candidate = if raw.starts_with("http") {
                    raw.to_string()
                } else {
                    format!("https://{raw}")
                };
                Url::parse(&candidate)
                    .map_err(|err| ActionError::InvalidInput(format!("{candidate}: {err}")))
            }
            NavigationTarget::GoogleSearch(query) => search_url(GOOGLE_SEARCH_URL, "q", query),
            NavigationTarget::YoutubeSearch(query) | NavigationTarget::YoutubePlay(query) => {
                search_url(YOUTUBE_RESULTS_URL, "search_query", query)
            }
        }
    }

    pub fn follow_up(&self) -> Option<FollowUpClick> {
        match self {
            NavigationTarget::YoutubePlay(_) => Some(FollowUpClick {
                selector: YOUTUBE_FIRST_VIDEO_SELECTOR,
                settle_ms: YOUTUBE_PLAY_SETTLE_MS,
            }),
            _ => None,
        }
    }
}

fn search_url(base: &str, param: &str, query: &str) -> Result<Url, ActionError> {
    let mut url = Url::parse(base).map_err(|err| ActionError::Internal(err.to_string()))?;
    url.query_pairs_mut().append_pair(param, query.trim());
    Ok(url)
}

/// Execute navigate primitive
pub async fn execute_navigate(
    ctx: &ExecCtx,
    document: &dyn PageDocument,
    target: &NavigationTarget,
) -> Result<Url, ActionError> {
    let url = target.destination()?;
    info!(
        action_id = %ctx.action_id,
        url = %url,
        "Executing navigate primitive"
    );
    document.navigate(url.as_str()).await?;
    Ok(url)
}
