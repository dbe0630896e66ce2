use std::sync::Arc;

use crate::fetchers::{ArticleSource, VideoMetadataSource};
use crate::llm_client::LanguageModel;
use crate::storage::SavedSummaries;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single model handle; stateless per call.
    pub model: Arc<dyn LanguageModel>,
    pub articles: Arc<dyn ArticleSource>,
    pub videos: Arc<dyn VideoMetadataSource>,
    pub summaries: SavedSummaries,
}
