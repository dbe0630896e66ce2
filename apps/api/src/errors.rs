use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StoreError;

/// Shown when the model provider fails and no flow-specific message applies.
pub const GENERIC_UPSTREAM_MESSAGE: &str =
    "Une erreur est survenue lors de la génération. Veuillez réessayer.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Messages carried by `Validation` and `Flow` are French and
/// user-facing: they are returned to the client verbatim.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A flow orchestrator rejected the model output or could not find content.
    #[error("Flow error: {0}")]
    Flow(String),

    /// Raw model-provider failure; details are logged, never shown.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {msg}");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Flow(msg) => {
                tracing::error!("Flow error: {msg}");
                (StatusCode::BAD_GATEWAY, "FLOW_ERROR", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    GENERIC_UPSTREAM_MESSAGE.to_string(),
                )
            }
            AppError::Store(e @ StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", e.user_message().to_string())
            }
            AppError::Store(e @ StoreError::MissingAccount) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.user_message().to_string(),
            ),
            AppError::Store(e @ StoreError::Invalid(detail)) => {
                tracing::warn!("Rejected saved summary: {detail}");
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    e.user_message().to_string(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    e.user_message().to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Une erreur interne est survenue.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Request bodies that cannot be decoded are a validation failure like any other.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Malformed JSON body: {}", rejection.body_text());
        AppError::Validation(
            "La requête est invalide : vérifiez les champs envoyés.".to_string(),
        )
    }
}

/// `Json` extractor whose rejection goes through `AppError`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
