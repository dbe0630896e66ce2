// All LLM prompt templates for the flows.
// Placeholders are `{name}` and are filled with `str::replace` by each flow.
// Shared fragments ({language_instruction}, {faithfulness_instruction}) come from llm_client::prompts.

/// Summary of free text. Placeholders: `{length_instruction}`, `{text}`.
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = r#"Summarize the following text for a student.

{length_instruction}
{language_instruction}
{faithfulness_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "the summary, as plain prose paragraphs separated by blank lines",
  "key_points": ["3 to 6 short sentences, one per key idea"]
}

TEXT:
{text}"#;

/// Translation. Placeholders: `{target_language}`, `{text}`.
pub const TRANSLATE_PROMPT_TEMPLATE: &str = r#"Translate the following text into {target_language}.
Keep the meaning, tone and paragraph structure. Do not summarize or add commentary.

Return a JSON object with this EXACT schema:
{
  "translated_text": "the full translation"
}

TEXT:
{text}"#;

/// Multiple-choice quiz. Placeholders: `{summary}`.
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Create a multiple-choice quiz that checks understanding of the summary below.

{language_instruction}
{faithfulness_instruction}

Rules:
- Between 3 and 5 questions.
- Each question has 3 or 4 options with ids "a", "b", "c" and optionally "d".
- Exactly one option is correct; "correct_option_id" MUST be the id of one of that question's options.
- Question ids are "q1", "q2", ...
- "explanation" briefly justifies the correct answer.

Return a JSON object with this EXACT schema:
{
  "questions": [
    {
      "id": "q1",
      "text": "question text",
      "options": [{"id": "a", "text": "option text"}],
      "correct_option_id": "a",
      "explanation": "why this answer is right"
    }
  ]
}

SUMMARY:
{summary}"#;

/// Revision sheet. Placeholders: `{summary}`.
pub const REVISION_SHEET_PROMPT_TEMPLATE: &str = r#"Turn the summary below into a revision sheet a student can learn from.

{language_instruction}
{faithfulness_instruction}

Rules:
- "summary": a condensed recap of 2 to 4 sentences.
- "key_points": between 3 and 7 short statements to memorize.
- "qa_pairs": between 3 and 5 question/answer pairs for self-testing.

Return a JSON object with this EXACT schema:
{
  "summary": "recap",
  "key_points": ["point"],
  "qa_pairs": [{"question": "question", "answer": "answer"}]
}

SUMMARY:
{summary}"#;

/// Encyclopedia article summary. Placeholders: `{length_instruction}`, `{title}`, `{text}`.
pub const ENCYCLOPEDIA_PROMPT_TEMPLATE: &str = r#"Summarize the following encyclopedia article titled "{title}" for a student.

{length_instruction}
{language_instruction}
{faithfulness_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "the summary, as plain prose paragraphs separated by blank lines",
  "key_points": ["3 to 6 short sentences, one per key idea"]
}

ARTICLE:
{text}"#;
