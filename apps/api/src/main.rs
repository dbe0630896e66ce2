mod config;
mod db;
mod dispatch;
mod documents;
mod errors;
mod fetchers;
mod flows;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::fetchers::wikipedia::WikipediaClient;
use crate::fetchers::youtube::YouTubeClient;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::postgres::PgSummaryStore;
use crate::storage::SavedSummaries;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Résumé IA API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (saved summaries)
    let db = create_pool(&config.database_url).await?;

    // Initialize model client
    let model = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize content fetchers
    let http = fetchers::http_client()?;
    let articles = WikipediaClient::new(http.clone());
    let videos = YouTubeClient::new(http, config.youtube_api_key.clone());
    if config.youtube_api_key.is_none() {
        info!("YOUTUBE_API_KEY not set; video summaries will run without metadata");
    }

    // Build app state
    let state = AppState {
        model: Arc::new(model),
        articles: Arc::new(articles),
        videos: Arc::new(videos),
        summaries: SavedSummaries::new(Arc::new(PgSummaryStore::new(db))),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the deployed UI host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
