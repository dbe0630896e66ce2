// External content fetchers.
// Fetchers never fail: network errors, missing content and malformed responses
// are logged and reported as `None` so callers can carry on without the content.

pub mod wikipedia;
pub mod youtube;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Plain-text article resolved from a search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub text: String,
}

/// Metadata of a video, as returned by the video host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub channel: Option<String>,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_article(&self, search_term: &str) -> Option<Article>;
}

#[async_trait]
pub trait VideoMetadataSource: Send + Sync {
    async fn fetch_metadata(&self, video_id: &str) -> Option<VideoMetadata>;
}

/// Shared HTTP client for the fetchers.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(concat!("resume-ia/", env!("CARGO_PKG_VERSION")))
        .build()
}
