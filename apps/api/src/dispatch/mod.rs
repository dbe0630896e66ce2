//! Action dispatcher — the single entry point the UI calls to turn a source into
//! a display-ready result.
//!
//! Flow: validate source → resolve source text (video metadata, document text) →
//!       summarize → per-format flow (revision sheet, quiz) → render HTML.
//!
//! Input validation happens before any network call: a rejected request never
//! reaches the model or the video host.

pub mod handlers;
pub mod render;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::fetchers::youtube::{extract_video_id, is_video_url, watch_url};
use crate::fetchers::{VideoMetadata, VideoMetadataSource};
use crate::flows::quiz::{generate_quiz, MIN_QUIZ_SOURCE_CHARS};
use crate::flows::revision_sheet::generate_revision_sheet;
use crate::flows::schema::{
    QuizDocument, QuizInput, RevisionSheetDocument, RevisionSheetInput, SummarizeTextInput,
    SummaryLength, SummaryOutput, TargetLanguage,
};
use crate::flows::summarize::summarize_text;
use crate::llm_client::LanguageModel;

pub const MIN_TEXT_CHARS: usize = 50;
/// Source text is cut to this many characters before prompting.
pub const MAX_SOURCE_CHARS: usize = 30_000;

pub const TEXT_TOO_SHORT: &str = "Le texte doit contenir au moins 50 caractères.";
pub const INVALID_VIDEO_URL: &str = "Veuillez fournir une URL YouTube valide.";
pub const EMPTY_DOCUMENT: &str = "Le document ne contient aucun texte exploitable.";
pub const CONTENT_TOO_SHORT: &str =
    "Le contenu est trop court pour générer un quiz ou une fiche de révision.";

/// Used when the text branch cannot get a summary from the model.
const TEXT_FALLBACK_SUMMARY: &str = "Le résumé automatique n'est pas disponible pour le moment. \
    Voici le début de votre texte :";
const FALLBACK_EXCERPT_CHARS: usize = 300;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Youtube,
    Pdf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Resume,
    Fiche,
    Qcm,
    Audio,
}

impl OutputFormat {
    fn title_prefix(self) -> &'static str {
        match self {
            OutputFormat::Resume => "Résumé",
            OutputFormat::Fiche => "Fiche de révision",
            OutputFormat::Qcm => "QCM",
            OutputFormat::Audio => "Résumé audio",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub source_kind: SourceKind,
    pub source_value: String,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub language: TargetLanguage,
    #[serde(default)]
    pub length: SummaryLength,
    /// Display name of the source, e.g. the uploaded file name.
    #[serde(default)]
    pub source_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_sheet: Option<RevisionSheetDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Source text ready for summarization.
struct ResolvedSource {
    label: String,
    text: String,
    source_url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ────────────────────────────────────────────────────────────────────────────

pub async fn dispatch(
    model: &dyn LanguageModel,
    videos: &dyn VideoMetadataSource,
    request: &DispatchRequest,
) -> Result<SummaryResult, AppError> {
    let source = resolve_source(videos, request).await?;
    info!(
        "Dispatching {:?} source '{}' as {:?}",
        request.source_kind, source.label, request.output_format
    );

    let summary_input = SummarizeTextInput {
        text: truncate_chars(&source.text, MAX_SOURCE_CHARS),
        length: request.length,
        language: request.language,
    };
    let base = match summarize_text(model, &summary_input).await {
        Ok(out) => out,
        Err(e) if request.source_kind == SourceKind::Text => {
            warn!("Text summary unavailable, using fallback: {e}");
            text_fallback(&source.text)
        }
        Err(e) => return Err(e),
    };

    let title = format!("{} - {}", request.output_format.title_prefix(), source.label);
    let mut result = SummaryResult {
        title,
        content: String::new(),
        quiz: None,
        revision_sheet: None,
        source_url: source.source_url,
    };

    match request.output_format {
        OutputFormat::Resume => {
            result.content = render::render_resume(&base.summary, &base.key_points);
        }
        OutputFormat::Audio => {
            result.content = render::render_audio(&base.summary, &base.key_points);
        }
        OutputFormat::Fiche => {
            let sheet = generate_revision_sheet(
                model,
                &RevisionSheetInput {
                    summary: study_material(&base.summary, &source.text)?,
                    language: request.language,
                },
            )
            .await?;
            result.content = render::render_revision_sheet(&sheet);
            result.revision_sheet = Some(sheet);
        }
        OutputFormat::Qcm => {
            let quiz = generate_quiz(
                model,
                &QuizInput {
                    summary: study_material(&base.summary, &source.text)?,
                    language: request.language,
                },
            )
            .await?;
            result.content = render::render_quiz(&base.summary, &quiz);
            result.quiz = Some(quiz);
        }
    }

    Ok(result)
}

async fn resolve_source(
    videos: &dyn VideoMetadataSource,
    request: &DispatchRequest,
) -> Result<ResolvedSource, AppError> {
    let value = request.source_value.trim();
    match request.source_kind {
        SourceKind::Text => {
            if value.chars().count() < MIN_TEXT_CHARS {
                return Err(AppError::Validation(TEXT_TOO_SHORT.to_string()));
            }
            Ok(ResolvedSource {
                label: "Texte personnalisé".to_string(),
                text: value.to_string(),
                source_url: None,
            })
        }
        SourceKind::Youtube => {
            let video_id = extract_video_id(value)
                .ok_or_else(|| AppError::Validation(INVALID_VIDEO_URL.to_string()))?;
            let metadata = videos.fetch_metadata(&video_id).await;
            let label = metadata
                .as_ref()
                .map(|m| m.title.trim())
                .filter(|t| !t.is_empty())
                .unwrap_or("Vidéo YouTube")
                .to_string();
            let url = if is_video_url(value) {
                value.to_string()
            } else {
                watch_url(&video_id)
            };
            Ok(ResolvedSource {
                label,
                text: video_source_text(&url, metadata.as_ref()),
                source_url: Some(url),
            })
        }
        SourceKind::Pdf => {
            if value.is_empty() {
                return Err(AppError::Validation(EMPTY_DOCUMENT.to_string()));
            }
            let label = request
                .source_label
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or("Document PDF")
                .to_string();
            Ok(ResolvedSource {
                label,
                text: value.to_string(),
                source_url: None,
            })
        }
    }
}

/// Text the model summarizes for a video. Without metadata only the reference is known,
/// and the text says so explicitly.
fn video_source_text(url: &str, metadata: Option<&VideoMetadata>) -> String {
    let Some(meta) = metadata else {
        return format!(
            "Vidéo YouTube : {url}\n\
             Les informations de cette vidéo (titre, description) ne sont pas disponibles. \
             Indique dans le résumé que seul le lien est connu et n'invente aucun contenu."
        );
    };

    let mut text = format!("Titre de la vidéo : {}\n", meta.title);
    if let Some(channel) = &meta.channel {
        text.push_str(&format!("Chaîne : {channel}\n"));
    }
    if !meta.description.trim().is_empty() {
        text.push_str(&format!("Description :\n{}\n", meta.description.trim()));
    }
    if !meta.tags.is_empty() {
        text.push_str(&format!("Mots-clés : {}\n", meta.tags.join(", ")));
    }
    text
}

/// Text handed to the quiz and revision-sheet flows. A summary too short to work from
/// is completed with the source it was written from.
fn study_material(summary: &str, source_text: &str) -> Result<String, AppError> {
    let summary = summary.trim();
    if summary.chars().count() >= MIN_QUIZ_SOURCE_CHARS {
        return Ok(summary.to_string());
    }

    let source = truncate_chars(source_text.trim(), MAX_SOURCE_CHARS);
    let material = if summary.is_empty() {
        source
    } else {
        format!("{summary}\n\n{source}")
    };
    if material.chars().count() < MIN_QUIZ_SOURCE_CHARS {
        return Err(AppError::Validation(CONTENT_TOO_SHORT.to_string()));
    }
    debug!(
        "Summary has {} chars, completing study material with the source",
        summary.chars().count()
    );
    Ok(material)
}

fn text_fallback(text: &str) -> SummaryOutput {
    let excerpt = truncate_chars(text, FALLBACK_EXCERPT_CHARS);
    let ellipsis = if text.chars().count() > FALLBACK_EXCERPT_CHARS {
        "…"
    } else {
        ""
    };
    SummaryOutput {
        summary: format!("{TEXT_FALLBACK_SUMMARY} « {excerpt}{ellipsis} »"),
        key_points: Vec::new(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::flows::schema::fixtures;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::LlmError;

    const FRENCH_PARAGRAPH: &str =
        "Le soleil se lève à l'est et se couche à l'ouest chaque jour.";

    /// Counts lookups so tests can prove no network call happened.
    #[derive(Default)]
    struct CountingVideos {
        metadata: Option<VideoMetadata>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VideoMetadataSource for CountingVideos {
        async fn fetch_metadata(&self, _video_id: &str) -> Option<VideoMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.metadata.clone()
        }
    }

    fn request(kind: SourceKind, value: &str, format: OutputFormat) -> DispatchRequest {
        DispatchRequest {
            source_kind: kind,
            source_value: value.to_string(),
            output_format: format,
            language: TargetLanguage::Fr,
            length: SummaryLength::Medium,
            source_label: None,
        }
    }

    fn summary_reply() -> serde_json::Value {
        json!({
            "summary": "Le soleil suit une trajectoire apparente d'est en ouest, ce qui rythme nos journées.",
            "key_points": ["Lever à l'est", "Coucher à l'ouest"]
        })
    }

    #[tokio::test]
    async fn test_text_resume_scenario() {
        assert!(FRENCH_PARAGRAPH.chars().count() >= 60);
        let model = ScriptedModel::new().reply(summary_reply());
        let videos = CountingVideos::default();

        let result = dispatch(
            &model,
            &videos,
            &request(SourceKind::Text, FRENCH_PARAGRAPH, OutputFormat::Resume),
        )
        .await
        .unwrap();

        assert!(result.title.starts_with("Résumé - Texte personnalisé"));
        assert!(result.content.contains("Points clés"));
        assert!(result.content.contains("Lever à l'est"));
        assert!(result.quiz.is_none());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_text_is_rejected_without_model_call() {
        let model = ScriptedModel::new();
        let videos = CountingVideos::default();
        let err = dispatch(
            &model,
            &videos,
            &request(SourceKind::Text, "Trente caractères pile, voilà.", OutputFormat::Resume),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg == TEXT_TOO_SHORT));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_length_threshold_counts_characters_not_bytes() {
        // 49 two-byte characters: 98 bytes but still too short.
        let text = "é".repeat(49);
        let model = ScriptedModel::new();
        let err = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Text, &text, OutputFormat::Resume),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_text_branch_falls_back_when_model_fails() {
        let model = ScriptedModel::new().fail(LlmError::Api {
            status: 503,
            message: "unavailable".into(),
        });
        let result = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Text, FRENCH_PARAGRAPH, OutputFormat::Resume),
        )
        .await
        .unwrap();

        assert!(result.content.contains("n'est pas disponible"));
        assert!(result.content.contains("Points clés"));
    }

    #[tokio::test]
    async fn test_invalid_video_url_rejected_before_network() {
        let model = ScriptedModel::new();
        let videos = CountingVideos::default();
        for url in ["https://vimeo.com/42", "pas une url", ""] {
            let err = dispatch(
                &model,
                &videos,
                &request(SourceKind::Youtube, url, OutputFormat::Resume),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Validation(msg) if msg == INVALID_VIDEO_URL));
        }
        assert_eq!(videos.calls.load(Ordering::SeqCst), 0);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_video_title_comes_from_metadata() {
        let model = ScriptedModel::new().reply(summary_reply());
        let videos = CountingVideos {
            metadata: Some(VideoMetadata {
                title: "Les lois de Newton".to_string(),
                description: "Cours de mécanique".to_string(),
                channel: Some("Physique facile".to_string()),
                tags: vec!["physique".to_string()],
            }),
            ..Default::default()
        };
        let url = "https://youtu.be/dQw4w9WgXcQ";

        let result = dispatch(
            &model,
            &videos,
            &request(SourceKind::Youtube, url, OutputFormat::Resume),
        )
        .await
        .unwrap();

        assert_eq!(result.title, "Résumé - Les lois de Newton");
        assert_eq!(result.source_url.as_deref(), Some(url));
        let prompt = model.prompt(0);
        assert!(prompt.contains("Cours de mécanique"));
        assert!(prompt.contains("Mots-clés : physique"));
    }

    #[tokio::test]
    async fn test_bare_video_id_gets_a_watch_url() {
        let model = ScriptedModel::new().reply(summary_reply());
        let videos = CountingVideos::default();
        let result = dispatch(
            &model,
            &videos,
            &request(SourceKind::Youtube, "dQw4w9WgXcQ", OutputFormat::Resume),
        )
        .await
        .unwrap();

        assert_eq!(
            result.source_url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert_eq!(videos.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_video_without_metadata_is_labeled() {
        let model = ScriptedModel::new().reply(summary_reply());
        let result = dispatch(
            &model,
            &CountingVideos::default(),
            &request(
                SourceKind::Youtube,
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                OutputFormat::Audio,
            ),
        )
        .await
        .unwrap();

        assert_eq!(result.title, "Résumé audio - Vidéo YouTube");
        assert!(result.content.contains("data-speech-text="));
        assert!(model.prompt(0).contains("ne sont pas disponibles"));
    }

    #[tokio::test]
    async fn test_qcm_uses_generated_quiz() {
        let quiz = fixtures::quiz(3);
        let model = ScriptedModel::new()
            .reply(summary_reply())
            .reply(serde_json::to_value(&quiz).unwrap());

        let result = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Text, FRENCH_PARAGRAPH, OutputFormat::Qcm),
        )
        .await
        .unwrap();

        assert!(result.title.starts_with("QCM - "));
        assert_eq!(result.quiz, Some(quiz));
        assert_eq!(result.content.matches("class=\"quiz__question\"").count(), 3);
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_fiche_attaches_revision_sheet() {
        let sheet = fixtures::sheet(4, 3);
        let model = ScriptedModel::new()
            .reply(summary_reply())
            .reply(serde_json::to_value(&sheet).unwrap());

        let result = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Text, FRENCH_PARAGRAPH, OutputFormat::Fiche),
        )
        .await
        .unwrap();

        assert!(result.title.starts_with("Fiche de révision - Texte personnalisé"));
        assert_eq!(result.revision_sheet, Some(sheet));
        assert!(result.content.contains("Questions / Réponses"));
    }

    fn short_summary_reply() -> serde_json::Value {
        json!({"summary": "Le soleil va d'est en ouest.", "key_points": []})
    }

    fn short_request(format: OutputFormat) -> DispatchRequest {
        let mut req = request(SourceKind::Text, FRENCH_PARAGRAPH, format);
        req.length = SummaryLength::Short;
        req
    }

    #[tokio::test]
    async fn test_qcm_with_short_summary_works_from_source_text() {
        let quiz = fixtures::quiz(3);
        let model = ScriptedModel::new()
            .reply(short_summary_reply())
            .reply(serde_json::to_value(&quiz).unwrap());

        let result = dispatch(
            &model,
            &CountingVideos::default(),
            &short_request(OutputFormat::Qcm),
        )
        .await
        .unwrap();

        assert_eq!(result.quiz, Some(quiz));
        assert_eq!(model.calls(), 2);
        let quiz_prompt = model.prompt(1);
        assert!(quiz_prompt.contains("Le soleil va d'est en ouest."));
        assert!(quiz_prompt.contains(FRENCH_PARAGRAPH));
    }

    #[tokio::test]
    async fn test_fiche_with_short_summary_works_from_source_text() {
        let sheet = fixtures::sheet(3, 3);
        let model = ScriptedModel::new()
            .reply(short_summary_reply())
            .reply(serde_json::to_value(&sheet).unwrap());

        let result = dispatch(
            &model,
            &CountingVideos::default(),
            &short_request(OutputFormat::Fiche),
        )
        .await
        .unwrap();

        assert_eq!(result.revision_sheet, Some(sheet));
        assert!(model.prompt(1).contains(FRENCH_PARAGRAPH));
    }

    #[tokio::test]
    async fn test_long_summary_is_used_alone_for_quiz() {
        let model = ScriptedModel::new()
            .reply(summary_reply())
            .reply(serde_json::to_value(fixtures::quiz(3)).unwrap());

        dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Text, FRENCH_PARAGRAPH, OutputFormat::Qcm),
        )
        .await
        .unwrap();

        assert!(!model.prompt(1).contains(FRENCH_PARAGRAPH));
    }

    #[tokio::test]
    async fn test_tiny_document_cannot_make_a_quiz() {
        let model = ScriptedModel::new().reply(json!({"summary": "Court.", "key_points": []}));
        let err = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Pdf, "Deux mots.", OutputFormat::Qcm),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg == CONTENT_TOO_SHORT));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_pdf_uses_document_text_and_label() {
        let model = ScriptedModel::new().reply(summary_reply());
        let mut req = request(
            SourceKind::Pdf,
            "Chapitre 1. La cellule est l'unité de base du vivant.",
            OutputFormat::Resume,
        );
        req.source_label = Some("biologie.pdf".to_string());

        let result = dispatch(&model, &CountingVideos::default(), &req).await.unwrap();

        assert_eq!(result.title, "Résumé - biologie.pdf");
        assert!(model.prompt(0).contains("unité de base du vivant"));
    }

    #[tokio::test]
    async fn test_empty_pdf_is_rejected() {
        let model = ScriptedModel::new();
        let err = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Pdf, "   ", OutputFormat::Resume),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == EMPTY_DOCUMENT));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_pdf_model_failure_is_not_masked() {
        let model = ScriptedModel::new().reply_raw("pas du json");
        let err = dispatch(
            &model,
            &CountingVideos::default(),
            &request(SourceKind::Pdf, FRENCH_PARAGRAPH, OutputFormat::Resume),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Flow(_)));
    }

    #[test]
    fn test_request_deserializes_ui_values() {
        let req: DispatchRequest = serde_json::from_value(json!({
            "source_kind": "youtube",
            "source_value": "https://youtu.be/dQw4w9WgXcQ",
            "output_format": "qcm",
            "language": "en"
        }))
        .unwrap();
        assert_eq!(req.source_kind, SourceKind::Youtube);
        assert_eq!(req.output_format, OutputFormat::Qcm);
        assert_eq!(req.language, TargetLanguage::En);
        assert_eq!(req.length, SummaryLength::Medium);
    }
}
