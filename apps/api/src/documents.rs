//! PDF text extraction for uploaded documents.
//!
//! Parsing is CPU-bound, so it runs inside `tokio::task::spawn_blocking`.

use bytes::Bytes;
use tracing::{info, warn};

use crate::dispatch::EMPTY_DOCUMENT;
use crate::errors::AppError;

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Le fichier envoyé est vide.".to_string()));
    }
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(AppError::Validation(
            "Le fichier dépasse la taille maximale de 10 Mo.".to_string(),
        ));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation(
            "Le fichier n'est pas un document PDF valide.".to_string(),
        ));
    }

    let size = bytes.len();
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        .map_err(|e| {
            warn!("PDF extraction failed: {e}");
            AppError::Validation("Impossible de lire le texte de ce PDF.".to_string())
        })?;

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(AppError::Validation(EMPTY_DOCUMENT.to_string()));
    }

    info!("Extracted {} chars from a {size}-byte PDF", text.chars().count());
    Ok(text)
}

/// Collapses runs of spaces inside lines and keeps at most one blank line between paragraphs.
pub fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;
    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        blank_run = 0;
    }
    out
}
