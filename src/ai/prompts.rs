//! Prompt assembly for batch refactoring requests
//!
//! One request carries the batch's source payload plus a numbered report
//! of the smells it covers, and demands a JSON object with one suggestion
//! per smell, keyed by `smell_index`.

use crate::batch::Batch;
use crate::models::Smell;

/// Snippets longer than this are truncated to keep the prompt lean
const SNIPPET_MAX_CHARS: usize = 800;

/// Context lines kept on each side of a smell's line range
const SNIPPET_CONTEXT_LINES: usize = 10;

/// Fallback when a smell has no usable line range
const SNIPPET_FALLBACK_LINES: usize = 100;

/// A smell paired with the code excerpt the model should look at.
#[derive(Debug, Clone)]
pub struct SmellEntry<'a> {
    pub smell: &'a Smell,
    pub snippet: String,
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub const SYSTEM: &'static str = "You are an expert software engineer \
specializing in code quality, design patterns and refactoring.";

    /// Extract the code around a smell: its line range plus a few lines of
    /// context on each side, truncated when very long. Lines are 1-based
    /// and inclusive; an empty or zero range falls back to the file head.
    pub fn extract_snippet(content: &str, line_start: u32, line_end: u32) -> String {
        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return "(code unavailable)".to_string();
        }

        let snippet = if line_start == 0 || line_end < line_start {
            lines
                .iter()
                .take(SNIPPET_FALLBACK_LINES)
                .copied()
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            let from = (line_start as usize - 1).saturating_sub(SNIPPET_CONTEXT_LINES);
            let to = (line_end as usize + SNIPPET_CONTEXT_LINES).min(lines.len());
            lines[from.min(lines.len())..to].join("\n")
        };

        if snippet.chars().count() > SNIPPET_MAX_CHARS {
            let truncated: String = snippet.chars().take(SNIPPET_MAX_CHARS).collect();
            format!("{truncated}\n// ... truncated ...")
        } else {
            snippet
        }
    }

    /// Build the user prompt for one batch. Entry numbering is batch-local
    /// and 0-based; the response's `smell_index` refers into it.
    pub fn batch_prompt(batch: &Batch, entries: &[SmellEntry]) -> String {
        let mut sources = String::new();
        for item in &batch.items {
            sources.push_str(&item.render());
        }
        Self::assemble(&sources, entries)
    }

    /// Characters the instruction template and smell report wrap around the
    /// source payload. The batch planner reserves this from its budget so
    /// the assembled prompt stays inside the request limit.
    pub fn overhead_chars(entries: &[SmellEntry]) -> usize {
        Self::assemble("", entries).chars().count()
    }

    fn assemble(sources: &str, entries: &[SmellEntry]) -> String {
        let mut report = String::new();
        for (idx, entry) in entries.iter().enumerate() {
            report.push_str(&format!(
                "--- Smell #{idx} ---\n\
                 Type: {}\n\
                 File: {}\n\
                 Location: {}\n\
                 Line Range: {}-{}\n\
                 Severity: {}\n\
                 Description: {}\n\
                 Code:\n```java\n{}\n```\n\n",
                entry.smell.smell_type,
                entry.smell.file_path,
                entry.smell.location,
                entry.smell.line_start,
                entry.smell.line_end,
                entry.smell.severity,
                entry.smell.description,
                entry.snippet,
            ));
        }

        format!(
            "You are given design smells detected in a codebase, together with \
the relevant source code. Analyze ALL the smells below and provide a \
refactoring suggestion for EACH one. Your suggestions should:\n\
1. Preserve the original functionality\n\
2. Improve the design\n\
3. Follow SOLID principles\n\
4. Use appropriate design patterns if applicable\n\
\n\
SOURCE CODE:\n{sources}\n\
DESIGN SMELLS TO ADDRESS:\n\n{report}\
Respond ONLY with valid JSON (no markdown, no extra text). Return a JSON \
object with a \"suggestions\" array containing one entry per smell:\n\
{{\n\
    \"suggestions\": [\n\
        {{\n\
            \"smell_index\": 0,\n\
            \"refactoring_technique\": \"technique name (e.g., Extract Method, Extract Class)\",\n\
            \"explanation\": \"why this refactoring helps\",\n\
            \"suggested_code\": \"the refactored code\",\n\
            \"changes_summary\": [\"list of specific changes made\"],\n\
            \"benefits\": [\"list of benefits from this refactoring\"],\n\
            \"potential_risks\": [\"any risks or considerations\"]\n\
        }}\n\
    ]\n\
}}"
        )
    }
}
