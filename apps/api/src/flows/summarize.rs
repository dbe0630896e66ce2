//! Text summarization flow.

use tracing::info;

use crate::errors::AppError;
use crate::flows::prompts::SUMMARIZE_PROMPT_TEMPLATE;
use crate::flows::schema::{SummarizeTextInput, SummaryOutput};
use crate::flows::{fill_shared_instructions, model_failure, schema_failure};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LanguageModel};

const FLOW: &str = "summarize_text";
const UNUSABLE_OUTPUT: &str =
    "Le modèle n'a pas pu produire de résumé pour ce texte. Veuillez reformuler ou réessayer.";

pub async fn summarize_text(
    model: &dyn LanguageModel,
    input: &SummarizeTextInput,
) -> Result<SummaryOutput, AppError> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Le texte à résumer est vide.".to_string()));
    }

    info!(
        "Summarizing {} chars (length={:?}, language={:?})",
        text.chars().count(),
        input.length,
        input.language
    );

    let prompt = fill_shared_instructions(SUMMARIZE_PROMPT_TEMPLATE, input.language)
        .replace("{length_instruction}", input.length.instruction())
        .replace("{text}", text);

    let output: SummaryOutput = call_json(model, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_failure(FLOW, UNUSABLE_OUTPUT, e))?;
    output
        .validate()
        .map_err(|v| schema_failure(FLOW, UNUSABLE_OUTPUT, v))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::flows::schema::{SummaryLength, TargetLanguage};
    use crate::llm_client::testing::ScriptedModel;

    fn input(text: &str, length: SummaryLength) -> SummarizeTextInput {
        SummarizeTextInput {
            text: text.to_string(),
            length,
            language: TargetLanguage::Fr,
        }
    }

    #[tokio::test]
    async fn test_prompt_carries_length_instruction_and_text() {
        let model = ScriptedModel::new().reply(json!({
            "summary": "La Révolution française commence en 1789.",
            "key_points": ["1789", "Fin de la monarchie absolue"]
        }));
        let out = summarize_text(
            &model,
            &input("La Révolution française est une période de bouleversements.", SummaryLength::Short),
        )
        .await
        .unwrap();

        assert_eq!(out.key_points.len(), 2);
        let prompt = model.prompt(0);
        assert!(prompt.contains(SummaryLength::Short.instruction()));
        assert!(prompt.contains("bouleversements"));
        assert!(prompt.contains("French"));
    }

    #[tokio::test]
    async fn test_braces_in_user_text_are_not_treated_as_placeholders() {
        let model = ScriptedModel::new().reply(json!({"summary": "ok"}));
        summarize_text(&model, &input("Le motif {length_instruction} reste tel quel.", SummaryLength::Long))
            .await
            .unwrap();
        assert!(model.prompt(0).contains("Le motif {length_instruction} reste tel quel."));
    }

    #[tokio::test]
    async fn test_blank_summary_is_a_flow_error() {
        let model = ScriptedModel::new().reply(json!({"summary": "   "}));
        let err = summarize_text(&model, &input("Un texte quelconque.", SummaryLength::Medium))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Flow(msg) if msg == UNUSABLE_OUTPUT));
    }

    #[tokio::test]
    async fn test_empty_text_never_reaches_the_model() {
        let model = ScriptedModel::new();
        let err = summarize_text(&model, &input("  \n ", SummaryLength::Medium))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.calls(), 0);
    }
}
