//! HTML fragments around a summary, one per output format.
//! Every string coming from the model or the user is escaped here.

use crate::flows::schema::{QuizDocument, RevisionSheetDocument};

/// At most this many key points are derived from prose when the model gave none.
const DERIVED_KEY_POINTS: usize = 5;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn html_attr(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}

/// One `<p>` per blank-line separated paragraph; single newlines become `<br>`.
fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(|l| html_escape(l.trim())).collect();
            format!("<p>{}</p>", lines.join("<br>"))
        })
        .collect()
}

fn bullet_list(items: &[String]) -> String {
    let lis: String = items
        .iter()
        .map(|i| format!("<li>{}</li>", html_escape(i.trim())))
        .collect();
    format!("<ul>{lis}</ul>")
}

/// Splits prose into sentences to stand in for missing key points.
pub fn derive_key_points(summary: &str) -> Vec<String> {
    let mut points = Vec::new();
    let mut current = String::new();
    for c in summary.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let sentence = current.trim();
            if sentence.chars().count() > 1 {
                points.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        points.push(rest.to_string());
    }
    points.truncate(DERIVED_KEY_POINTS);
    points
}

fn key_points_section(summary: &str, key_points: &[String]) -> String {
    let derived;
    let points: &[String] = if key_points.is_empty() {
        derived = derive_key_points(summary);
        &derived
    } else {
        key_points
    };
    format!(
        "<section class=\"summary__key-points\"><h3>Points clés</h3>{}</section>",
        bullet_list(points)
    )
}

pub fn render_resume(summary: &str, key_points: &[String]) -> String {
    format!(
        "<article class=\"summary summary--resume\">\
         <section class=\"summary__body\">{}</section>{}</article>",
        paragraphs(summary),
        key_points_section(summary, key_points)
    )
}

pub fn render_revision_sheet(sheet: &RevisionSheetDocument) -> String {
    let qa: String = sheet
        .qa_pairs
        .iter()
        .map(|p| {
            format!(
                "<dt>{}</dt><dd>{}</dd>",
                html_escape(&p.question),
                html_escape(&p.answer)
            )
        })
        .collect();
    format!(
        "<article class=\"summary summary--fiche\">\
         <section class=\"fiche__summary\"><h3>Résumé</h3>{}</section>\
         <section class=\"fiche__key-points\"><h3>Points clés</h3>{}</section>\
         <section class=\"fiche__qa\"><h3>Questions / Réponses</h3><dl>{qa}</dl></section>\
         </article>",
        paragraphs(&sheet.summary),
        bullet_list(&sheet.key_points)
    )
}

/// The quiz is rendered for reading; answer checking uses the structured payload.
pub fn render_quiz(summary: &str, quiz: &QuizDocument) -> String {
    let questions: String = quiz
        .questions
        .iter()
        .map(|q| {
            let options: String = q
                .options
                .iter()
                .map(|o| {
                    format!(
                        "<li data-option-id=\"{}\">{}</li>",
                        html_attr(&o.id),
                        html_escape(&o.text)
                    )
                })
                .collect();
            let explanation = q
                .explanation
                .as_deref()
                .map(|e| format!("<p class=\"quiz__explanation\">{}</p>", html_escape(e)))
                .unwrap_or_default();
            let correct = q
                .options
                .iter()
                .find(|o| o.id == q.correct_option_id)
                .map(|o| o.text.as_str())
                .unwrap_or_default();
            format!(
                "<li class=\"quiz__question\" data-question-id=\"{}\"><p>{}</p><ol type=\"a\">{options}</ol>\
                 <details><summary>Voir la réponse</summary><p>{}</p>{explanation}</details></li>",
                html_attr(&q.id),
                html_escape(&q.text),
                html_escape(correct)
            )
        })
        .collect();
    format!(
        "<article class=\"summary summary--qcm\">\
         <section class=\"summary__body\"><h3>Résumé</h3>{}</section>\
         <section class=\"quiz\"><h3>QCM</h3><ol>{questions}</ol></section></article>",
        paragraphs(summary)
    )
}

/// The browser reads `data-speech-text` aloud with its own speech synthesis.
pub fn render_audio(summary: &str, key_points: &[String]) -> String {
    format!(
        "<article class=\"summary summary--audio\" data-speech-text=\"{}\">\
         <p class=\"summary__audio-hint\">Appuyez sur lecture pour écouter ce résumé.</p>\
         <section class=\"summary__body\">{}</section>{}</article>",
        html_attr(&speech_text(summary)),
        paragraphs(summary),
        key_points_section(summary, key_points)
    )
}

/// Flattens paragraphs into a single utterance.
fn speech_text(summary: &str) -> String {
    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}
