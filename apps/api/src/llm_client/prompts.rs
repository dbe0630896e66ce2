// Shared prompt fragments.
// Each flow defines its own templates in flows/prompts.rs; this file only holds
// the cross-cutting pieces they all append.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant for a French study app. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every generation prompt. Replace `{language}` before sending.
pub const OUTPUT_LANGUAGE_INSTRUCTION: &str = "\
    Write every string value of the JSON output in {language}. \
    Never copy sentences verbatim from the source when a reformulation is clearer.";

/// Keeps the model from padding thin sources with invented facts.
pub const FAITHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Use only information present in the provided source. \
    Do NOT invent names, dates or figures. \
    If the source is thin, produce a shorter output rather than filling gaps.";
