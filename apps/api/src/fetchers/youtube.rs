//! Video reference parsing and metadata lookup (YouTube Data API v3).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::fetchers::{VideoMetadata, VideoMetadataSource};

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

static VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.|music\.)?(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|shorts/|embed/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/].*)?$",
    )
    .expect("video URL pattern is valid")
});

static BARE_VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// Extracts the 11-character video id from the URL shapes the host serves,
/// or accepts a bare id as is.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if BARE_VIDEO_ID.is_match(url) {
        return Some(url.to_string());
    }
    VIDEO_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// True for a full video link. A bare id is not a URL.
pub fn is_video_url(url: &str) -> bool {
    VIDEO_URL.is_match(url.trim())
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    channel_title: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

fn metadata_from_body(body: &str) -> Option<VideoMetadata> {
    let parsed: VideoListResponse = serde_json::from_str(body).ok()?;
    let snippet = parsed.items.into_iter().next()?.snippet;
    Some(VideoMetadata {
        title: snippet.title,
        description: snippet.description,
        channel: snippet.channel_title,
        tags: snippet.tags,
    })
}

/// Keyed metadata client. Without a key every lookup is `None` and no request is made.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl VideoMetadataSource for YouTubeClient {
    async fn fetch_metadata(&self, video_id: &str) -> Option<VideoMetadata> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No YouTube API key configured, skipping metadata for {video_id}");
            return None;
        };

        let response = match self
            .client
            .get(VIDEOS_ENDPOINT)
            .query(&[("part", "snippet"), ("id", video_id), ("key", api_key)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("YouTube metadata request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("YouTube metadata returned {} for {video_id}", response.status());
            return None;
        }

        let body = response.text().await.ok()?;
        let metadata = metadata_from_body(&body);
        if metadata.is_none() {
            debug!("No video found for id {video_id}");
        }
        metadata
    }
}
