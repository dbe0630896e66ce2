use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::saved_summary::SavedSummaryRow;
use crate::storage::{NewSavedSummary, SavedSummary, StoreError, SummaryStore};

/// `SummaryStore` over the `saved_summaries` table.
#[derive(Clone)]
pub struct PgSummaryStore {
    pool: PgPool,
}

impl PgSummaryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryStore for PgSummaryStore {
    async fn insert(
        &self,
        account_id: &str,
        summary: NewSavedSummary,
    ) -> Result<SavedSummary, StoreError> {
        let row = sqlx::query_as::<_, SavedSummaryRow>(
            r#"
            INSERT INTO saved_summaries
                (id, account_id, title, content, quiz, revision_sheet, source_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(&summary.title)
        .bind(&summary.content)
        .bind(summary.quiz.map(Json))
        .bind(summary.revision_sheet.map(Json))
        .bind(&summary.source_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self, account_id: &str) -> Result<Vec<SavedSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SavedSummaryRow>(
            "SELECT * FROM saved_summaries WHERE account_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SavedSummary::from).collect())
    }

    async fn delete(&self, account_id: &str, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM saved_summaries WHERE id = $1 AND account_id = $2")
            .bind(id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("summary {id}")));
        }
        Ok(())
    }
}
