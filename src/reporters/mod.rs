//! Output reporters for run results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod text;

use crate::models::RunReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a run report in the specified format
pub fn report(report: &RunReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render a run report using an OutputFormat enum
pub fn report_with_format(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Create a minimal RunReport for testing
    pub(crate) fn test_report() -> RunReport {
        use crate::models::{DetectionMethod, Severity, Smell, SmellSummary, Suggestion};

        let smells = vec![
            Smell {
                smell_type: "God Class".into(),
                file_path: "src/OrderManager.java".into(),
                location: "OrderManager".into(),
                line_start: 1,
                line_end: 340,
                severity: Severity::High,
                description: "Class has 24 methods (max 15)".into(),
                detection_method: DetectionMethod::Static,
            },
            Smell {
                smell_type: "Long Method".into(),
                file_path: "src/OrderManager.java".into(),
                location: "process()".into(),
                line_start: 40,
                line_end: 120,
                severity: Severity::Medium,
                description: "Method spans 81 lines (max 50)".into(),
                detection_method: DetectionMethod::Static,
            },
        ];

        RunReport {
            timestamp: "2026-08-30T12:00:00+00:00".into(),
            repo_path: "/work/demo".into(),
            files_scanned: 12,
            total_lines: 3400,
            summary: SmellSummary::from_smells(&smells),
            smells,
            suggestions: vec![Suggestion {
                id: "s1".into(),
                smell_index: 0,
                smell_type: "God Class".into(),
                file_path: "src/OrderManager.java".into(),
                location: "OrderManager".into(),
                technique: "Extract Class".into(),
                explanation: "Split order persistence out of OrderManager".into(),
                original_snippet: "class OrderManager { ... }".into(),
                suggested_code: "class OrderManager { ... }\nclass OrderStore { ... }".into(),
                changes_summary: vec!["Moved persistence methods to OrderStore".into()],
                benefits: vec!["Single responsibility".into()],
                risks: vec!["Callers must be updated".into()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_file_extensions() {
        assert_eq!(file_extension(OutputFormat::Json), "json");
        assert_eq!(file_extension(OutputFormat::Markdown), "md");
    }
}
