//! Quiz generation flow — turns a summary into a validated `QuizDocument`.

use tracing::info;

use crate::errors::AppError;
use crate::flows::prompts::QUIZ_PROMPT_TEMPLATE;
use crate::flows::schema::{QuizDocument, QuizInput};
use crate::flows::{fill_shared_instructions, model_failure, schema_failure};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LanguageModel};

const FLOW: &str = "generate_quiz";

/// Below this many characters the model cannot write 3 distinct questions.
pub const MIN_QUIZ_SOURCE_CHARS: usize = 50;

pub const QUIZ_SOURCE_TOO_SHORT: &str = "Le résumé est trop court pour générer un quiz. \
    Veuillez fournir un résumé plus long (au moins 50 caractères).";
const UNUSABLE_OUTPUT: &str =
    "Impossible de générer un quiz valide à partir de ce résumé. Veuillez réessayer.";

pub async fn generate_quiz(
    model: &dyn LanguageModel,
    input: &QuizInput,
) -> Result<QuizDocument, AppError> {
    let summary = input.summary.trim();
    if summary.chars().count() < MIN_QUIZ_SOURCE_CHARS {
        return Err(AppError::Validation(QUIZ_SOURCE_TOO_SHORT.to_string()));
    }

    info!("Generating quiz from {} chars", summary.chars().count());

    let prompt =
        fill_shared_instructions(QUIZ_PROMPT_TEMPLATE, input.language).replace("{summary}", summary);

    let quiz: QuizDocument = call_json(model, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_failure(FLOW, UNUSABLE_OUTPUT, e))?;
    quiz.validate()
        .map_err(|v| schema_failure(FLOW, UNUSABLE_OUTPUT, v))?;

    info!("Quiz generated with {} questions", quiz.questions.len());
    Ok(quiz)
}
