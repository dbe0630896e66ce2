//! Axum route handlers for the dispatcher.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::dispatch::{dispatch, DispatchRequest, OutputFormat, SourceKind, SummaryResult};
use crate::documents::extract_pdf_text;
use crate::errors::{ApiJson, AppError};
use crate::flows::schema::{SummaryLength, TargetLanguage};
use crate::state::AppState;

/// POST /api/v1/summaries
pub async fn handle_dispatch(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DispatchRequest>,
) -> Result<Json<SummaryResult>, AppError> {
    let result = dispatch(state.model.as_ref(), state.videos.as_ref(), &request).await?;
    Ok(Json(result))
}

/// POST /api/v1/summaries/document
///
/// Multipart form: `file` (the PDF) plus optional `output_format`, `language`, `length`.
pub async fn handle_dispatch_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SummaryResult>, AppError> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut output_format = OutputFormat::default();
    let mut language = TargetLanguage::default();
    let mut length = SummaryLength::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(invalid_form)?;
                file = Some((file_name, data));
            }
            Some("output_format") => {
                let value = field.text().await.map_err(invalid_form)?;
                output_format = parse_field(&value, "Format de sortie inconnu.")?;
            }
            Some("language") => {
                let value = field.text().await.map_err(invalid_form)?;
                language = parse_field(&value, "Langue non prise en charge.")?;
            }
            Some("length") => {
                let value = field.text().await.map_err(invalid_form)?;
                length = SummaryLength::from_key(&value);
            }
            _ => {}
        }
    }

    let (file_name, data) = file.ok_or_else(|| {
        AppError::Validation("Veuillez joindre un document PDF.".to_string())
    })?;
    let text = extract_pdf_text(data).await?;

    let request = DispatchRequest {
        source_kind: SourceKind::Pdf,
        source_value: text,
        output_format,
        language,
        length,
        source_label: file_name,
    };
    let result = dispatch(state.model.as_ref(), state.videos.as_ref(), &request).await?;
    Ok(Json(result))
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Formulaire invalide : {e}"))
}

/// Parses a bare form value with the same spelling the JSON API accepts.
fn parse_field<T: DeserializeOwned>(value: &str, message: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase()))
        .map_err(|_| AppError::Validation(message.to_string()))
}
