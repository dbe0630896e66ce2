//! Encyclopedia flow: search term → article text → summary.

use tracing::info;

use crate::errors::AppError;
use crate::fetchers::ArticleSource;
use crate::flows::prompts::ENCYCLOPEDIA_PROMPT_TEMPLATE;
use crate::flows::schema::{EncyclopediaInput, EncyclopediaSummary, SummaryOutput};
use crate::flows::{fill_shared_instructions, model_failure, schema_failure};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, LanguageModel};

const FLOW: &str = "summarize_encyclopedia";
const UNUSABLE_OUTPUT: &str =
    "Le modèle n'a pas pu résumer cet article. Veuillez réessayer.";

/// Articles are cut to this many characters before prompting.
const MAX_ARTICLE_CHARS: usize = 30_000;

pub async fn summarize_encyclopedia(
    model: &dyn LanguageModel,
    source: &dyn ArticleSource,
    input: &EncyclopediaInput,
) -> Result<EncyclopediaSummary, AppError> {
    let term = input.search_term.trim();
    if term.is_empty() {
        return Err(AppError::Validation(
            "Veuillez saisir un sujet de recherche.".to_string(),
        ));
    }

    let article = source
        .fetch_article(term)
        .await
        .ok_or_else(|| AppError::Flow(format!("Aucun article Wikipédia trouvé pour « {term} ».")))?;

    info!(
        "Summarizing article '{}' ({} chars)",
        article.title,
        article.text.chars().count()
    );

    let text: String = article.text.chars().take(MAX_ARTICLE_CHARS).collect();
    let prompt = fill_shared_instructions(ENCYCLOPEDIA_PROMPT_TEMPLATE, input.language)
        .replace("{length_instruction}", input.length.instruction())
        .replace("{title}", &article.title)
        .replace("{text}", &text);

    let output: SummaryOutput = call_json(model, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| model_failure(FLOW, UNUSABLE_OUTPUT, e))?;
    output
        .validate()
        .map_err(|v| schema_failure(FLOW, UNUSABLE_OUTPUT, v))?;

    Ok(EncyclopediaSummary {
        title: article.title,
        summary: output.summary,
        key_points: output.key_points,
        source_url: article.url,
    })
}
