//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for pull request comments, wikis and
//! documentation.

use crate::models::{RunReport, Suggestion};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &RunReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');
    md.push_str(&render_summary(report));
    md.push('\n');
    md.push_str(&render_smells(report));
    md.push('\n');
    md.push_str(&render_suggestions(report));

    if !report.errors.is_empty() {
        md.push('\n');
        md.push_str("## Errors\n\n");
        for error in &report.errors {
            md.push_str(&format!("- {error}\n"));
        }
    }

    Ok(md)
}

fn render_header(report: &RunReport) -> String {
    format!(
        "# Refactoring Report\n\n\
         **Repository:** `{}`\n\n\
         Generated: {}\n",
        report.repo_path, report.timestamp
    )
}

fn render_summary(report: &RunReport) -> String {
    let s = &report.summary;
    let mut md = String::from("## Summary\n\n");
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!("| Files scanned | {} |\n", report.files_scanned));
    md.push_str(&format!("| Total lines | {} |\n", report.total_lines));
    md.push_str(&format!("| Smells found | {} |\n", s.total));
    md.push_str(&format!("| High severity | {} |\n", s.high));
    md.push_str(&format!("| Medium severity | {} |\n", s.medium));
    md.push_str(&format!("| Low severity | {} |\n", s.low));
    md
}

fn render_smells(report: &RunReport) -> String {
    let mut md = String::from("## Detected Smells\n\n");
    if report.smells.is_empty() {
        md.push_str("No design smells detected.\n");
        return md;
    }

    md.push_str("| Severity | Type | Location | File | Lines |\n");
    md.push_str("|----------|------|----------|------|-------|\n");
    for smell in &report.smells {
        md.push_str(&format!(
            "| {} | {} | `{}` | `{}` | {}-{} |\n",
            smell.severity,
            smell.smell_type,
            smell.location,
            smell.file_path,
            smell.line_start,
            smell.line_end
        ));
    }
    md
}

fn render_suggestions(report: &RunReport) -> String {
    let mut md = String::from("## Refactoring Suggestions\n\n");
    if report.suggestions.is_empty() {
        md.push_str("No suggestions were generated.\n");
        return md;
    }

    for (i, suggestion) in report.suggestions.iter().enumerate() {
        md.push_str(&render_suggestion(i + 1, suggestion));
        md.push('\n');
    }
    md
}

fn render_suggestion(number: usize, suggestion: &Suggestion) -> String {
    let mut md = format!(
        "### {number}. {} — {}\n\n\
         **File:** `{}` | **Location:** `{}`\n\n\
         {}\n\n",
        suggestion.technique, suggestion.smell_type, suggestion.file_path, suggestion.location,
        suggestion.explanation
    );

    if !suggestion.original_snippet.is_empty() {
        md.push_str(&format!(
            "<details>\n<summary>View original snippet</summary>\n\n\
             ```java\n{}\n```\n\n</details>\n\n",
            suggestion.original_snippet
        ));
    }

    if !suggestion.suggested_code.is_empty() {
        md.push_str(&format!("```java\n{}\n```\n\n", suggestion.suggested_code));
    }

    if !suggestion.changes_summary.is_empty() {
        md.push_str("**Changes:**\n");
        for change in &suggestion.changes_summary {
            md.push_str(&format!("- {change}\n"));
        }
        md.push('\n');
    }
    if !suggestion.benefits.is_empty() {
        md.push_str("**Benefits:**\n");
        for benefit in &suggestion.benefits {
            md.push_str(&format!("- {benefit}\n"));
        }
        md.push('\n');
    }
    if !suggestion.risks.is_empty() {
        md.push_str("**Risks:**\n");
        for risk in &suggestion.risks {
            md.push_str(&format!("- {risk}\n"));
        }
        md.push('\n');
    }

    md
}
