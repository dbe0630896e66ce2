//! Encyclopedia fetcher backed by the MediaWiki action API.
//!
//! Resolution is two steps: `list=search` turns the term into a canonical title,
//! then `prop=extracts` returns the article as plain text. The intro extract is
//! preferred; when it is shorter than `MIN_INTRO_CHARS` the full article is fetched.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::fetchers::{Article, ArticleSource};

pub const DEFAULT_API_URL: &str = "https://fr.wikipedia.org/w/api.php";
pub const DEFAULT_ARTICLE_BASE: &str = "https://fr.wikipedia.org/wiki/";

/// Intro extracts shorter than this are too thin to summarize.
pub const MIN_INTRO_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    extract: Option<String>,
    missing: Option<serde_json::Value>,
}

fn first_search_title(body: &str) -> Option<String> {
    let parsed: SearchResponse = serde_json::from_str(body).ok()?;
    parsed
        .query?
        .search
        .into_iter()
        .next()
        .map(|hit| hit.title)
}

fn page_extract(body: &str) -> Option<String> {
    let parsed: ExtractResponse = serde_json::from_str(body).ok()?;
    parsed
        .query?
        .pages
        .into_values()
        .filter(|page| page.missing.is_none())
        .find_map(|page| page.extract)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    api_url: String,
    article_base: String,
}

impl WikipediaClient {
    pub fn new(client: Client) -> Self {
        Self::with_endpoints(client, DEFAULT_API_URL, DEFAULT_ARTICLE_BASE)
    }

    pub fn with_endpoints(client: Client, api_url: &str, article_base: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            article_base: article_base.to_string(),
        }
    }

    pub fn article_url(&self, title: &str) -> String {
        format!("{}{}", self.article_base, title.replace(' ', "_"))
    }

    async fn get(&self, params: &[(&str, &str)]) -> Option<String> {
        let response = match self.client.get(&self.api_url).query(params).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Wikipedia request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("Wikipedia returned {}", response.status());
            return None;
        }
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Wikipedia body unreadable: {e}");
                None
            }
        }
    }

    /// Resolves a search term to the title of the best-matching article.
    pub async fn search(&self, term: &str) -> Option<String> {
        let body = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", "1"),
                ("format", "json"),
                ("utf8", "1"),
            ])
            .await?;
        let title = first_search_title(&body);
        if title.is_none() {
            debug!("No Wikipedia result for '{term}'");
        }
        title
    }

    /// Plain-text content of an article, falling back from the intro to the full text.
    pub async fn fetch_text(&self, title: &str) -> Option<String> {
        let base = [
            ("action", "query"),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("format", "json"),
            ("titles", title),
        ];

        let mut intro_params = base.to_vec();
        intro_params.push(("exintro", "1"));
        let intro = self.get(&intro_params).await.and_then(|b| page_extract(&b));

        match intro {
            Some(text) if text.chars().count() >= MIN_INTRO_CHARS => Some(text),
            short => {
                debug!("Intro for '{title}' too short, fetching full article");
                self.get(&base)
                    .await
                    .and_then(|b| page_extract(&b))
                    .or(short)
            }
        }
    }
}

#[async_trait]
impl ArticleSource for WikipediaClient {
    async fn fetch_article(&self, search_term: &str) -> Option<Article> {
        let title = self.search(search_term.trim()).await?;
        let text = self.fetch_text(&title).await?;
        Some(Article {
            url: self.article_url(&title),
            title,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_search_title_picks_top_hit() {
        let body = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":2},
            "search":[{"ns":0,"title":"Photosynthèse","pageid":1},{"ns":0,"title":"Chlorophylle","pageid":2}]}}"#;
        assert_eq!(first_search_title(body).as_deref(), Some("Photosynthèse"));
    }

    #[test]
    fn test_empty_search_yields_none() {
        assert!(first_search_title(r#"{"query":{"search":[]}}"#).is_none());
        assert!(first_search_title("not json").is_none());
        assert!(first_search_title(r#"{"error":{"code":"x"}}"#).is_none());
    }

    #[test]
    fn test_page_extract_reads_plain_text() {
        let body = r#"{"query":{"pages":{"42":{"pageid":42,"title":"Photosynthèse",
            "extract":"  La photosynthèse est un processus.  "}}}}"#;
        assert_eq!(
            page_extract(body).as_deref(),
            Some("La photosynthèse est un processus.")
        );
    }

    #[test]
    fn test_missing_page_yields_none() {
        let body = r#"{"query":{"pages":{"-1":{"ns":0,"title":"Zzzz","missing":""}}}}"#;
        assert!(page_extract(body).is_none());
    }

    #[test]
    fn test_article_url_uses_underscores() {
        let client = WikipediaClient::new(Client::new());
        assert_eq!(
            client.article_url("Révolution française"),
            "https://fr.wikipedia.org/wiki/Révolution_française"
        );
    }

    #[tokio::test]
    async fn test_unreachable_api_returns_none() {
        let client =
            WikipediaClient::with_endpoints(Client::new(), "http://127.0.0.1:9/w/api.php", "x/");
        assert!(client.fetch_article("Photosynthèse").await.is_none());
    }
}
