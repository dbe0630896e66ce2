//! Axum route handlers exposing each flow directly.

use axum::{extract::State, Json};

use crate::errors::{ApiJson, AppError};
use crate::flows::encyclopedia::summarize_encyclopedia;
use crate::flows::quiz::generate_quiz;
use crate::flows::revision_sheet::generate_revision_sheet;
use crate::flows::schema::{
    EncyclopediaInput, EncyclopediaSummary, QuizDocument, QuizInput, RevisionSheetDocument,
    RevisionSheetInput, SummarizeTextInput, SummaryOutput, TranslateInput, TranslationOutput,
};
use crate::flows::summarize::summarize_text;
use crate::flows::translate::translate_text;
use crate::state::AppState;

/// POST /api/v1/flows/summarize
pub async fn handle_summarize(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SummarizeTextInput>,
) -> Result<Json<SummaryOutput>, AppError> {
    Ok(Json(summarize_text(state.model.as_ref(), &input).await?))
}

/// POST /api/v1/flows/translate
pub async fn handle_translate(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TranslateInput>,
) -> Result<Json<TranslationOutput>, AppError> {
    Ok(Json(translate_text(state.model.as_ref(), &input).await?))
}

/// POST /api/v1/flows/quiz
pub async fn handle_quiz(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<QuizInput>,
) -> Result<Json<QuizDocument>, AppError> {
    Ok(Json(generate_quiz(state.model.as_ref(), &input).await?))
}

/// POST /api/v1/flows/revision-sheet
pub async fn handle_revision_sheet(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RevisionSheetInput>,
) -> Result<Json<RevisionSheetDocument>, AppError> {
    Ok(Json(
        generate_revision_sheet(state.model.as_ref(), &input).await?,
    ))
}

/// POST /api/v1/flows/encyclopedia
///
/// Looks the term up on Wikipedia and summarizes the article.
pub async fn handle_encyclopedia(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EncyclopediaInput>,
) -> Result<Json<EncyclopediaSummary>, AppError> {
    Ok(Json(
        summarize_encyclopedia(state.model.as_ref(), state.articles.as_ref(), &input).await?,
    ))
}
