//! Saved summaries: the only persisted entity.
//!
//! `SummaryStore` is the persistence port (Postgres in production, in-memory in
//! tests). `SavedSummaries` wraps a store and publishes a change notification per
//! account after every write so subscribed readers can refresh their list.

pub mod handlers;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::flows::schema::{QuizDocument, RevisionSheetDocument};

const MAX_TITLE_CHARS: usize = 300;
const FEED_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Missing account id")]
    MissingAccount,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Provider error code: the SQLSTATE for database errors, a short tag otherwise.
    pub fn code(&self) -> Option<String> {
        match self {
            StoreError::Database(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
            StoreError::Database(sqlx::Error::PoolTimedOut) => Some("pool_timeout".to_string()),
            StoreError::Database(sqlx::Error::Io(_)) => Some("io".to_string()),
            _ => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Invalid(_) => "Le résumé à enregistrer est invalide.",
            StoreError::MissingAccount => "Identifiant de compte manquant.",
            StoreError::NotFound(_) => "Résumé introuvable.",
            StoreError::Database(_) => friendly_storage_message(self.code().as_deref()),
        }
    }
}

/// Maps known storage provider codes to messages the user can act on.
pub fn friendly_storage_message(code: Option<&str>) -> &'static str {
    match code {
        Some("23505") => "Ce résumé est déjà enregistré.",
        Some("23503") => "Le compte associé à ce résumé est introuvable.",
        Some("23514") | Some("22001") => "Ce résumé ne peut pas être enregistré : données invalides.",
        Some("42501") => "Vous n'avez pas l'autorisation d'effectuer cette action.",
        Some("pool_timeout") | Some("io") => {
            "Le service de stockage est momentanément indisponible. Veuillez réessayer."
        }
        Some(c) if c.starts_with("08") => {
            "Le service de stockage est momentanément indisponible. Veuillez réessayer."
        }
        _ => "Une erreur est survenue lors de l'accès à vos résumés.",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSummary {
    pub id: Uuid,
    pub account_id: String,
    pub title: String,
    pub content: String,
    pub quiz: Option<QuizDocument>,
    pub revision_sheet: Option<RevisionSheetDocument>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of a save request: a `SummaryResult` the user chose to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavedSummary {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub quiz: Option<QuizDocument>,
    #[serde(default)]
    pub revision_sheet: Option<RevisionSheetDocument>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl NewSavedSummary {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Invalid("title is empty".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(StoreError::Invalid("title is too long".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(StoreError::Invalid("content is empty".to_string()));
        }
        if let Some(quiz) = &self.quiz {
            quiz.validate()
                .map_err(|v| StoreError::Invalid(format!("quiz: {v}")))?;
        }
        if let Some(sheet) = &self.revision_sheet {
            sheet
                .validate()
                .map_err(|v| StoreError::Invalid(format!("revision sheet: {v}")))?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn insert(&self, account_id: &str, summary: NewSavedSummary)
        -> Result<SavedSummary, StoreError>;

    /// Newest first.
    async fn list(&self, account_id: &str) -> Result<Vec<SavedSummary>, StoreError>;

    /// `NotFound` when the id does not exist for this account.
    async fn delete(&self, account_id: &str, id: Uuid) -> Result<(), StoreError>;
}

/// Store plus change feed. Cheap to clone.
#[derive(Clone)]
pub struct SavedSummaries {
    store: Arc<dyn SummaryStore>,
    changes: broadcast::Sender<String>,
}

impl SavedSummaries {
    pub fn new(store: Arc<dyn SummaryStore>) -> Self {
        let (changes, _) = broadcast::channel(FEED_CAPACITY);
        Self { store, changes }
    }

    pub async fn save(
        &self,
        account_id: &str,
        summary: NewSavedSummary,
    ) -> Result<SavedSummary, StoreError> {
        check_account(account_id)?;
        summary.validate()?;
        let saved = self.store.insert(account_id, summary).await?;
        info!("Saved summary {} for account {account_id}", saved.id);
        self.notify(account_id);
        Ok(saved)
    }

    pub async fn list(&self, account_id: &str) -> Result<Vec<SavedSummary>, StoreError> {
        check_account(account_id)?;
        self.store.list(account_id).await
    }

    pub async fn delete(&self, account_id: &str, id: Uuid) -> Result<(), StoreError> {
        check_account(account_id)?;
        self.store.delete(account_id, id).await?;
        info!("Deleted summary {id} for account {account_id}");
        self.notify(account_id);
        Ok(())
    }

    /// Receives the account id of every account whose list changed.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }

    fn notify(&self, account_id: &str) {
        // No subscribers is not an error.
        let _ = self.changes.send(account_id.to_string());
    }
}

fn check_account(account_id: &str) -> Result<(), StoreError> {
    if account_id.trim().is_empty() {
        Err(StoreError::MissingAccount)
    } else {
        Ok(())
    }
}
