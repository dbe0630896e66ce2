pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::dispatch::handlers as dispatch_handlers;
use crate::documents::MAX_DOCUMENT_BYTES;
use crate::flows::handlers as flow_handlers;
use crate::state::AppState;
use crate::storage::handlers as summary_handlers;

/// Multipart overhead on top of the document itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Action dispatcher
        .route("/api/v1/summaries", post(dispatch_handlers::handle_dispatch))
        .route(
            "/api/v1/summaries/document",
            post(dispatch_handlers::handle_dispatch_document)
                .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
        // Individual flows
        .route("/api/v1/flows/summarize", post(flow_handlers::handle_summarize))
        .route("/api/v1/flows/translate", post(flow_handlers::handle_translate))
        .route("/api/v1/flows/quiz", post(flow_handlers::handle_quiz))
        .route(
            "/api/v1/flows/revision-sheet",
            post(flow_handlers::handle_revision_sheet),
        )
        .route(
            "/api/v1/flows/encyclopedia",
            post(flow_handlers::handle_encyclopedia),
        )
        // Saved summaries
        .route(
            "/api/v1/accounts/:account_id/summaries",
            get(summary_handlers::handle_list).post(summary_handlers::handle_save),
        )
        .route(
            "/api/v1/accounts/:account_id/summaries/events",
            get(summary_handlers::handle_events),
        )
        .route(
            "/api/v1/accounts/:account_id/summaries/:id",
            delete(summary_handlers::handle_delete),
        )
        .with_state(state)
}
