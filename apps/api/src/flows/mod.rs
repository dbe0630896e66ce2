// Flow orchestrators: one per AI operation.
// Each flow validates its input, fills its template from prompts.rs, calls the
// model through llm_client::call_json, and validates the answer against schema.rs.
// No flow retries: a failed call is reported to the caller as-is.

pub mod encyclopedia;
pub mod handlers;
pub mod prompts;
pub mod quiz;
pub mod revision_sheet;
pub mod schema;
pub mod summarize;
pub mod translate;

use tracing::warn;

use crate::errors::AppError;
use crate::flows::schema::{SchemaViolation, TargetLanguage};
use crate::llm_client::prompts::{FAITHFULNESS_INSTRUCTION, OUTPUT_LANGUAGE_INSTRUCTION};
use crate::llm_client::LlmError;

/// Fills the placeholders every template shares.
/// Call this before inserting user content so that braces in the content are left alone.
pub(crate) fn fill_shared_instructions(template: &str, language: TargetLanguage) -> String {
    template
        .replace(
            "{language_instruction}",
            &OUTPUT_LANGUAGE_INSTRUCTION.replace("{language}", language.prompt_name()),
        )
        .replace("{faithfulness_instruction}", FAITHFULNESS_INSTRUCTION)
}

/// Maps a model-client failure to the caller-facing error.
/// Unusable output gets the flow's own message; transport and provider failures stay generic.
pub(crate) fn model_failure(flow: &str, user_message: &str, error: LlmError) -> AppError {
    match error {
        LlmError::EmptyContent | LlmError::Parse(_) => {
            warn!("{flow}: unusable model output: {error}");
            AppError::Flow(user_message.to_string())
        }
        LlmError::Http(_) | LlmError::Api { .. } => AppError::Llm(format!("{flow}: {error}")),
    }
}

/// Maps a contract violation in otherwise well-formed output.
pub(crate) fn schema_failure(flow: &str, user_message: &str, violation: SchemaViolation) -> AppError {
    warn!("{flow}: model output violates schema: {violation}");
    AppError::Flow(user_message.to_string())
}
