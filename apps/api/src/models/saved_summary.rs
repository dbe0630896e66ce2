use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::flows::schema::{QuizDocument, RevisionSheetDocument};
use crate::storage::SavedSummary;

#[derive(Debug, Clone, FromRow)]
pub struct SavedSummaryRow {
    pub id: Uuid,
    pub account_id: String,
    pub title: String,
    pub content: String,
    pub quiz: Option<Json<QuizDocument>>,
    pub revision_sheet: Option<Json<RevisionSheetDocument>>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SavedSummaryRow> for SavedSummary {
    fn from(row: SavedSummaryRow) -> Self {
        SavedSummary {
            id: row.id,
            account_id: row.account_id,
            title: row.title,
            content: row.content,
            quiz: row.quiz.map(|Json(q)| q),
            revision_sheet: row.revision_sheet.map(|Json(s)| s),
            source_url: row.source_url,
            created_at: row.created_at,
        }
    }
}
