//! Tolerant parsing of batch suggestion responses
//!
//! Models wrap JSON in markdown fences, drop optional fields and sometimes
//! return a bogus `smell_index`. The parser strips fences, accepts field
//! aliases, defaults what is missing and falls back to positional matching
//! for out-of-range indices. Only unparseable JSON is an error.

use serde::Deserialize;
use tracing::warn;

use crate::ai::prompts::SmellEntry;
use crate::ai::{AiError, AiResult};
use crate::models::Suggestion;

/// Kept snippet length on the suggestion record
const SNIPPET_KEEP_CHARS: usize = 500;

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    suggestions: Vec<RawSuggestion>,
}

#[derive(Deserialize, Default)]
struct RawSuggestion {
    #[serde(default)]
    smell_index: Option<i64>,
    #[serde(default, alias = "technique")]
    refactoring_technique: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    suggested_code: Option<String>,
    #[serde(default)]
    changes_summary: Option<Vec<String>>,
    #[serde(default)]
    benefits: Option<Vec<String>>,
    #[serde(default, alias = "risks")]
    potential_risks: Option<Vec<String>>,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Remove a wrapping markdown code fence if present. Idempotent.
    pub fn strip_fences(raw: &str) -> &str {
        let mut cleaned = raw.trim();
        if let Some(rest) = cleaned.strip_prefix("```json") {
            cleaned = rest;
        } else if let Some(rest) = cleaned.strip_prefix("```") {
            cleaned = rest;
        }
        if let Some(rest) = cleaned.strip_suffix("```") {
            cleaned = rest;
        }
        cleaned.trim()
    }

    /// Decode one batch response against the entries its prompt was built
    /// from. Deterministic: the same response and entries always produce
    /// the same suggestions. The returned records carry batch-local
    /// `smell_index` values and an empty `id`; the caller remaps the index
    /// into the run's smell list and assigns the id on acceptance.
    ///
    /// An out-of-range or missing `smell_index` falls back to the next
    /// unfilled position; entries beyond the smell count are dropped.
    pub fn parse(raw: &str, entries: &[SmellEntry]) -> AiResult<Vec<Suggestion>> {
        let cleaned = Self::strip_fences(raw);
        let response: RawResponse = serde_json::from_str(cleaned)
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        let mut suggestions: Vec<Suggestion> = Vec::new();

        for raw_suggestion in response.suggestions {
            let claimed = raw_suggestion.smell_index.unwrap_or(-1);
            let index = if claimed >= 0 && (claimed as usize) < entries.len() {
                claimed as usize
            } else {
                // position of the next accepted suggestion
                let positional = suggestions.len();
                if positional >= entries.len() {
                    warn!(
                        claimed,
                        "dropping suggestion with no matching smell position"
                    );
                    continue;
                }
                positional
            };

            let entry = &entries[index];
            let snippet: String = entry.snippet.chars().take(SNIPPET_KEEP_CHARS).collect();

            suggestions.push(Suggestion {
                id: String::new(),
                smell_index: index,
                smell_type: entry.smell.smell_type.clone(),
                file_path: entry.smell.file_path.clone(),
                location: entry.smell.location.clone(),
                technique: raw_suggestion
                    .refactoring_technique
                    .unwrap_or_else(|| "Unknown".to_string()),
                explanation: raw_suggestion.explanation.unwrap_or_default(),
                original_snippet: snippet,
                suggested_code: raw_suggestion.suggested_code.unwrap_or_default(),
                changes_summary: raw_suggestion.changes_summary.unwrap_or_default(),
                benefits: raw_suggestion.benefits.unwrap_or_default(),
                risks: raw_suggestion.potential_risks.unwrap_or_default(),
            });
        }

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetectionMethod, Severity, Smell};

    fn smell(path: &str) -> Smell {
        Smell {
            smell_type: "God Class".to_string(),
            file_path: path.to_string(),
            location: "Big".to_string(),
            line_start: 1,
            line_end: 40,
            severity: Severity::High,
            description: "does too much".to_string(),
            detection_method: DetectionMethod::Static,
        }
    }

    fn entries(smells: &[Smell]) -> Vec<SmellEntry<'_>> {
        smells
            .iter()
            .map(|s| SmellEntry {
                smell: s,
                snippet: format!("code of {}", s.file_path),
            })
            .collect()
    }

    #[test]
    fn test_strip_fences_is_idempotent() {
        let fenced = "```json\n{\"suggestions\": []}\n```";
        let once = ResponseParser::strip_fences(fenced);
        assert_eq!(once, "{\"suggestions\": []}");
        assert_eq!(ResponseParser::strip_fences(once), once);
    }

    #[test]
    fn test_fenced_and_bare_responses_parse_alike() {
        let smells = vec![smell("A.java")];
        let entries = entries(&smells);
        let bare = r#"{"suggestions": [{"smell_index": 0, "refactoring_technique": "Extract Class"}]}"#;
        let fenced = format!("```json\n{bare}\n```");

        let a = ResponseParser::parse(bare, &entries).unwrap();
        let b = ResponseParser::parse(&fenced, &entries).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].technique, b[0].technique);
        assert_eq!(a[0].smell_index, b[0].smell_index);
    }

    #[test]
    fn test_out_of_range_index_falls_back_to_position() {
        let smells = vec![smell("A.java"), smell("B.java")];
        let entries = entries(&smells);
        let raw = r#"{"suggestions": [
            {"smell_index": 99, "refactoring_technique": "Extract Method"},
            {"smell_index": -1, "refactoring_technique": "Extract Class"}
        ]}"#;

        let parsed = ResponseParser::parse(raw, &entries).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].smell_index, 0);
        assert_eq!(parsed[0].file_path, "A.java");
        assert_eq!(parsed[1].smell_index, 1);
        assert_eq!(parsed[1].file_path, "B.java");
    }

    #[test]
    fn test_surplus_suggestions_are_dropped() {
        let smells = vec![smell("A.java")];
        let entries = entries(&smells);
        let raw = r#"{"suggestions": [
            {"smell_index": 0},
            {"smell_index": 7},
            {"smell_index": 12}
        ]}"#;

        let parsed = ResponseParser::parse(raw, &entries).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_aliases_and_defaults() {
        let smells = vec![smell("A.java")];
        let entries = entries(&smells);
        let raw = r#"{"suggestions": [
            {"smell_index": 0, "technique": "Move Method", "risks": ["behavior change"]}
        ]}"#;

        let parsed = ResponseParser::parse(raw, &entries).unwrap();
        let s = &parsed[0];
        assert_eq!(s.technique, "Move Method");
        assert_eq!(s.risks, vec!["behavior change"]);
        assert!(s.explanation.is_empty());
        assert!(s.benefits.is_empty());
        assert_eq!(s.original_snippet, "code of A.java");
    }

    #[test]
    fn test_parsing_the_same_response_twice_gives_equal_results() {
        let smells = vec![smell("A.java"), smell("B.java")];
        let entries = entries(&smells);
        let raw = r#"{"suggestions": [
            {"smell_index": 0, "refactoring_technique": "Extract Method", "explanation": "split it"},
            {"smell_index": 1, "technique": "Move Method", "benefits": ["cohesion"]}
        ]}"#;

        let first = ResponseParser::parse(raw, &entries).unwrap();
        let second = ResponseParser::parse(raw, &entries).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_technique_defaults_to_unknown() {
        let smells = vec![smell("A.java")];
        let entries = entries(&smells);
        let parsed =
            ResponseParser::parse(r#"{"suggestions": [{"smell_index": 0}]}"#, &entries).unwrap();
        assert_eq!(parsed[0].technique, "Unknown");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let smells = vec![smell("A.java")];
        let entries = entries(&smells);
        let err = ResponseParser::parse("not json at all", &entries).unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }

    #[test]
    fn test_empty_suggestions_object_is_ok() {
        let parsed = ResponseParser::parse("{}", &[]).unwrap();
        assert!(parsed.is_empty());
    }
}
