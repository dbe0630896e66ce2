//! Schema contracts — input and output shapes for every flow.
//!
//! Model output is deserialized into these types and then `validate()`d before
//! anything downstream trusts it. Serde enforces field presence; `validate()`
//! enforces the count bounds and cross-references serde cannot express.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const QUIZ_QUESTIONS: (usize, usize) = (3, 5);
pub const QUIZ_OPTIONS: (usize, usize) = (3, 4);
pub const SHEET_KEY_POINTS: (usize, usize) = (3, 7);
pub const SHEET_QA_PAIRS: (usize, usize) = (3, 5);

/// Describes why a model answer does not match its contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("{field}: expected between {min} and {max} items, got {actual}")]
    Count {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{0} must not be empty")]
    Empty(String),

    #[error("question {question}: duplicate option id '{option}'")]
    DuplicateOption { question: String, option: String },

    #[error("question {question}: correct option '{correct}' is not one of its options")]
    DanglingAnswer { question: String, correct: String },
}

fn check_count(field: &str, actual: usize, (min, max): (usize, usize)) -> Result<(), SchemaViolation> {
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(SchemaViolation::Count {
            field: field.to_string(),
            min,
            max,
            actual,
        })
    }
}

fn check_text(field: &str, value: &str) -> Result<(), SchemaViolation> {
    if value.trim().is_empty() {
        Err(SchemaViolation::Empty(field.to_string()))
    } else {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Input selectors
// ────────────────────────────────────────────────────────────────────────────

/// Requested summary length. Unknown keys fall back to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "short" | "court" | "courte" => SummaryLength::Short,
            "long" | "longue" | "detailed" | "détaillé" => SummaryLength::Long,
            _ => SummaryLength::Medium,
        }
    }

    /// Length/style instruction interpolated into the summary prompts.
    pub fn instruction(self) -> &'static str {
        match self {
            SummaryLength::Short => {
                "Write a short summary of 2 to 3 sentences that keeps only the central idea."
            }
            SummaryLength::Medium => {
                "Write a summary of one or two paragraphs covering the main ideas and their links."
            }
            SummaryLength::Long => {
                "Write a detailed summary of several paragraphs covering every important idea, \
                 example and conclusion."
            }
        }
    }
}

impl From<String> for SummaryLength {
    fn from(key: String) -> Self {
        SummaryLength::from_key(&key)
    }
}

/// Output language of generated content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Fr,
    En,
    Es,
    De,
    It,
}

impl TargetLanguage {
    /// Language name as the model should read it in a prompt.
    pub fn prompt_name(self) -> &'static str {
        match self {
            TargetLanguage::Fr => "French",
            TargetLanguage::En => "English",
            TargetLanguage::Es => "Spanish",
            TargetLanguage::De => "German",
            TargetLanguage::It => "Italian",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeTextInput {
    pub text: String,
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub language: TargetLanguage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateInput {
    pub text: String,
    pub target_language: TargetLanguage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizInput {
    pub summary: String,
    #[serde(default)]
    pub language: TargetLanguage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionSheetInput {
    pub summary: String,
    #[serde(default)]
    pub language: TargetLanguage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncyclopediaInput {
    pub search_term: String,
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub language: TargetLanguage,
}

// ────────────────────────────────────────────────────────────────────────────
// Flow outputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl SummaryOutput {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_text("summary", &self.summary)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub translated_text: String,
}

impl TranslationOutput {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_text("translated_text", &self.translated_text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncyclopediaSummary {
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDocument {
    pub questions: Vec<QuizQuestion>,
}

impl QuizDocument {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_count("questions", self.questions.len(), QUIZ_QUESTIONS)?;
        for question in &self.questions {
            check_text("question.id", &question.id)?;
            check_text("question.text", &question.text)?;
            check_count(
                &format!("question {} options", question.id),
                question.options.len(),
                QUIZ_OPTIONS,
            )?;

            let mut seen = HashSet::new();
            for option in &question.options {
                check_text("option.id", &option.id)?;
                check_text("option.text", &option.text)?;
                if !seen.insert(option.id.as_str()) {
                    return Err(SchemaViolation::DuplicateOption {
                        question: question.id.clone(),
                        option: option.id.clone(),
                    });
                }
            }

            if !seen.contains(question.correct_option_id.as_str()) {
                return Err(SchemaViolation::DanglingAnswer {
                    question: question.id.clone(),
                    correct: question.correct_option_id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionSheetDocument {
    pub summary: String,
    pub key_points: Vec<String>,
    pub qa_pairs: Vec<QaPair>,
}

impl RevisionSheetDocument {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_text("summary", &self.summary)?;
        check_count("key_points", self.key_points.len(), SHEET_KEY_POINTS)?;
        check_count("qa_pairs", self.qa_pairs.len(), SHEET_QA_PAIRS)?;
        for point in &self.key_points {
            check_text("key_point", point)?;
        }
        for pair in &self.qa_pairs {
            check_text("qa_pair.question", &pair.question)?;
            check_text("qa_pair.answer", &pair.answer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn question(id: &str, option_count: usize, correct: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            text: format!("Question {id} ?"),
            options: (0..option_count)
                .map(|i| QuizOption {
                    id: ["a", "b", "c", "d", "e"][i].to_string(),
                    text: format!("Réponse {i}"),
                })
                .collect(),
            correct_option_id: correct.to_string(),
            explanation: None,
        }
    }

    pub fn quiz(question_count: usize) -> QuizDocument {
        QuizDocument {
            questions: (1..=question_count)
                .map(|i| question(&format!("q{i}"), 4, "b"))
                .collect(),
        }
    }

    pub fn sheet(key_points: usize, qa_pairs: usize) -> RevisionSheetDocument {
        RevisionSheetDocument {
            summary: "La photosynthèse convertit la lumière en énergie chimique.".to_string(),
            key_points: (0..key_points).map(|i| format!("Point {i}")).collect(),
            qa_pairs: (0..qa_pairs)
                .map(|i| QaPair {
                    question: format!("Question {i} ?"),
                    answer: format!("Réponse {i}"),
                })
                .collect(),
        }
    }
}
