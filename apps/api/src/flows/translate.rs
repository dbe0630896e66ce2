//! Translation flow.

use tracing::info;

use crate::errors::AppError;
use crate::flows::prompts::TRANSLATE_PROMPT_TEMPLATE;
use crate::flows::schema::{TranslateInput, TranslationOutput};
use crate::flows::{model_failure, schema_failure};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LanguageModel};

const FLOW: &str = "translate_text";
const UNUSABLE_OUTPUT: &str = "La traduction a échoué. Veuillez réessayer.";

pub async fn translate_text(
    model: &dyn LanguageModel,
    input: &TranslateInput,
) -> Result<TranslationOutput, AppError> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Le texte à traduire est vide.".to_string()));
    }

    info!(
        "Translating {} chars into {:?}",
        text.chars().count(),
        input.target_language
    );

    let prompt = TRANSLATE_PROMPT_TEMPLATE
        .replace("{target_language}", input.target_language.prompt_name())
        .replace("{text}", text);

    let output: TranslationOutput = call_json(model, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_failure(FLOW, UNUSABLE_OUTPUT, e))?;
    output
        .validate()
        .map_err(|v| schema_failure(FLOW, UNUSABLE_OUTPUT, v))?;

    Ok(output)
}
