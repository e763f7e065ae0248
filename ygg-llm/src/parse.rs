//! Response extraction: recovering structure from free-form model output.
//!
//! Models wrap their JSON in prose, code fences and apologies. These helpers
//! find the part worth parsing and degrade gracefully when there is none.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{LlmError, Result};

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

static TAG_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{[^{]*"Event ID"[^}]*\}"#).expect("valid regex"));

static QUOTED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\["(.+?)"\]"#).expect("valid regex"));

/// Parse the outermost `{ … }` span of `text` (first `{` to last `}`).
///
/// # Errors
/// Returns [`LlmError::ParseError`] when there is no such span or it is not
/// valid JSON.
pub fn extract_json_object(text: &str) -> Result<Value> {
    let span = JSON_OBJECT
        .find(text)
        .ok_or_else(|| LlmError::ParseError(format!("no JSON object in '{}'", preview(text))))?;
    serde_json::from_str(span.as_str()).map_err(|e| LlmError::ParseError(e.to_string()))
}

/// Parse the first flat `{ … }` object that mentions `"Event ID"`.
///
/// # Errors
/// Returns [`LlmError::ParseError`] when no such object exists or it is not
/// valid JSON.
pub fn extract_tag_object(text: &str) -> Result<Value> {
    let span = TAG_OBJECT
        .find(text)
        .ok_or_else(|| LlmError::ParseError(format!("no tag object in '{}'", preview(text))))?;
    serde_json::from_str(span.as_str()).map_err(|e| LlmError::ParseError(e.to_string()))
}

/// Recover a list of entity strings from a model response.
///
/// Tried in order:
/// 1. the response (or its bracketed span) as a JSON list, single quotes
///    accepted;
/// 2. the first `["…"]` run, split on `", "`;
/// 3. brackets stripped and the remainder split on commas, dropping entries
///    made only of stop words and pronouns.
///
/// Never fails: an unusable response yields an empty list.
#[must_use]
pub fn parse_entity_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    let normalized = trimmed.replace('\'', "\"");

    let candidates = [
        Some(trimmed),
        Some(normalized.as_str()),
        bracketed(trimmed),
        bracketed(&normalized),
    ];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(candidate) {
            return clean(items.into_iter().map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            }));
        }
    }

    if let Some(caps) = QUOTED_LIST.captures(&normalized) {
        return clean(caps[1].split("\", \"").map(str::to_string));
    }

    let stripped = trimmed.trim_start_matches('[').trim_end_matches(']');
    clean(
        stripped
            .split(',')
            .map(|item| item.trim().trim_matches(['"', '\'']).to_string())
            .filter(|item| !is_function_words(item)),
    )
}

/// Whether every word of `phrase` is a stop word or pronoun.
#[must_use]
pub fn is_function_words(phrase: &str) -> bool {
    phrase
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .all(|w| STOP_WORDS.contains(&w.to_lowercase().as_str()))
}

fn bracketed(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn clean(items: impl Iterator<Item = String>) -> Vec<String> {
    items
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

/// English function words: pronouns, determiners, conjunctions and common
/// stop words.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "even", "every", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "mine", "more", "most", "my", "myself", "neither", "no", "nor",
    "not", "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "though", "through", "to", "too", "under", "until", "up", "us", "very",
    "was", "we", "were", "what", "whatever", "when", "where", "whether", "which", "while", "who",
    "whom", "whose", "why", "will", "with", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_inside_prose() {
        let value = extract_json_object(
            "Sure! Here it is:\n```json\n{\"Event ID\": \"event_1\", \"Temporal Context\": {\"TimeOfDay\": \"Day\"}}\n```",
        )
        .expect("object");
        assert_eq!(value["Event ID"], "event_1");
        assert_eq!(value["Temporal Context"]["TimeOfDay"], "Day");
    }

    #[test]
    fn no_object_is_a_parse_error() {
        assert!(matches!(
            extract_json_object("I cannot help with that."),
            Err(LlmError::ParseError(_))
        ));
    }

    #[test]
    fn tag_object_skips_other_objects() {
        let value = extract_tag_object(
            "{\"note\": 1} then {\"Event ID\": \"event_4\", \"Assigned Emotion\": \"Fear\", \"Emotion Intensity\": 0.7}",
        )
        .expect("tag");
        assert_eq!(value["Assigned Emotion"], "Fear");
    }

    #[test]
    fn entity_list_variants() {
        assert_eq!(parse_entity_list(r#"["Father", "attic"]"#), ["Father", "attic"]);
        assert_eq!(parse_entity_list("['Margot', 'diary']"), ["Margot", "diary"]);
        assert_eq!(
            parse_entity_list("Entities:\n```\n[\"Peter\", \"doorbell rang\"]\n```"),
            ["Peter", "doorbell rang"]
        );
        assert!(parse_entity_list("[]").is_empty());
    }

    #[test]
    fn fallback_split_filters_function_words() {
        assert_eq!(
            parse_entity_list("[Father, she, the, Miep, and I]"),
            ["Father", "Miep"]
        );
    }

    #[test]
    fn function_words() {
        assert!(is_function_words("and I"));
        assert!(is_function_words(""));
        assert!(!is_function_words("the attic"));
    }
}
