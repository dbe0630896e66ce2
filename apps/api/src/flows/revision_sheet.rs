//! Revision sheet flow — summary, key points and self-test Q&A.

use tracing::info;

use crate::errors::AppError;
use crate::flows::prompts::REVISION_SHEET_PROMPT_TEMPLATE;
use crate::flows::quiz::MIN_QUIZ_SOURCE_CHARS;
use crate::flows::schema::{RevisionSheetDocument, RevisionSheetInput};
use crate::flows::{fill_shared_instructions, model_failure, schema_failure};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LanguageModel};

const FLOW: &str = "generate_revision_sheet";

pub const SHEET_SOURCE_TOO_SHORT: &str = "Le résumé est trop court pour générer une fiche de révision. \
    Veuillez fournir un résumé plus long (au moins 50 caractères).";
const UNUSABLE_OUTPUT: &str =
    "Impossible de générer une fiche de révision valide. Veuillez réessayer.";

pub async fn generate_revision_sheet(
    model: &dyn LanguageModel,
    input: &RevisionSheetInput,
) -> Result<RevisionSheetDocument, AppError> {
    let summary = input.summary.trim();
    if summary.chars().count() < MIN_QUIZ_SOURCE_CHARS {
        return Err(AppError::Validation(SHEET_SOURCE_TOO_SHORT.to_string()));
    }

    info!("Generating revision sheet from {} chars", summary.chars().count());

    let prompt = fill_shared_instructions(REVISION_SHEET_PROMPT_TEMPLATE, input.language)
        .replace("{summary}", summary);

    let sheet: RevisionSheetDocument = call_json(model, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_failure(FLOW, UNUSABLE_OUTPUT, e))?;
    sheet
        .validate()
        .map_err(|v| schema_failure(FLOW, UNUSABLE_OUTPUT, v))?;

    Ok(sheet)
}
