//! Axum route handlers for saved summaries.
//!
//! The caller asserts the account id; sign-in happens at the identity provider.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{ApiJson, AppError};
use crate::state::AppState;
use crate::storage::{NewSavedSummary, SavedSummaries, SavedSummary};

/// GET /api/v1/accounts/:account_id/summaries
pub async fn handle_list(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<SavedSummary>>, AppError> {
    Ok(Json(state.summaries.list(&account_id).await?))
}

/// POST /api/v1/accounts/:account_id/summaries
pub async fn handle_save(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    ApiJson(summary): ApiJson<NewSavedSummary>,
) -> Result<(StatusCode, Json<SavedSummary>), AppError> {
    let saved = state.summaries.save(&account_id, summary).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/accounts/:account_id/summaries/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path((account_id, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.summaries.delete(&account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/accounts/:account_id/summaries/events
///
/// Sends the full list once on connect, then again after every change to this account.
pub async fn handle_events(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Subscribe before the first read so no change between the two is missed.
    let rx = state.summaries.subscribe();
    let initial = state.summaries.list(&account_id).await?;
    debug!("SSE client subscribed to summaries of {account_id}");

    let library = state.summaries.clone();
    let updates = BroadcastStream::new(rx).filter_map(move |change| {
        let library = library.clone();
        let account_id = account_id.clone();
        async move {
            match change {
                Ok(changed) if changed == account_id => refreshed_list(&library, &account_id).await,
                Ok(_) => None,
                Err(e) => {
                    // Lagged: notifications were dropped, so resend unconditionally.
                    warn!("Summary feed lagged: {e:?}");
                    refreshed_list(&library, &account_id).await
                }
            }
        }
    });

    let events = stream::once(async move { initial })
        .chain(updates)
        .filter_map(|list| async move {
            match Event::default().event("summaries").json_data(&list) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    warn!("Failed to serialize summaries event: {e}");
                    None
                }
            }
        });

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

async fn refreshed_list(library: &SavedSummaries, account_id: &str) -> Option<Vec<SavedSummary>> {
    match library.list(account_id).await {
        Ok(list) => Some(list),
        Err(e) => {
            warn!("Failed to reload summaries for {account_id}: {e}");
            None
        }
    }
}
