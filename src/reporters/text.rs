//! Text (terminal) reporter with colors and formatting

use crate::models::{RunReport, RunStatus, Severity};
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Severity colors (ANSI escape codes)
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "\x1b[91m",   // Light red
        Severity::Medium => "\x1b[33m", // Yellow
        Severity::Low => "\x1b[34m",    // Blue
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "[H]",
        Severity::Medium => "[M]",
        Severity::Low => "[L]",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &RunReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Refactory Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Files: {}  LOC: {}  Smells: {}\n\n",
        report.files_scanned, report.total_lines, report.summary.total
    ));

    let s = &report.summary;
    let mut summary_parts = Vec::new();
    if s.high > 0 {
        summary_parts.push(format!("\x1b[91m{} high{RESET}", s.high));
    }
    if s.medium > 0 {
        summary_parts.push(format!("\x1b[33m{} medium{RESET}", s.medium));
    }
    if s.low > 0 {
        summary_parts.push(format!("\x1b[34m{} low{RESET}", s.low));
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n\n", summary_parts.join(" | ")));
    }

    if !report.smells.is_empty() {
        out.push_str(&format!("{BOLD}SMELLS{RESET}\n"));
        for smell in &report.smells {
            let color = severity_color(smell.severity);
            out.push_str(&format!(
                "  {color}{}{RESET} {} {DIM}({}, lines {}-{}){RESET}\n      {}\n",
                severity_tag(smell.severity),
                smell.smell_type,
                smell.file_path,
                smell.line_start,
                smell.line_end,
                smell.description
            ));
        }
        out.push('\n');
    } else {
        out.push_str("  No design smells detected.\n\n");
    }

    if !report.suggestions.is_empty() {
        out.push_str(&format!(
            "{BOLD}SUGGESTIONS{RESET} ({})\n",
            report.suggestions.len()
        ));
        for suggestion in &report.suggestions {
            out.push_str(&format!(
                "  {BOLD}{}{RESET} for {} in {}\n      {}\n",
                suggestion.technique,
                suggestion.smell_type,
                suggestion.file_path,
                suggestion.explanation
            ));
        }
        out.push('\n');
    }

    if !report.errors.is_empty() {
        out.push_str(&format!("{BOLD}ERRORS{RESET}\n"));
        for error in &report.errors {
            out.push_str(&format!("  \x1b[91m!{RESET} {error}\n"));
        }
        out.push('\n');
    }

    let status = match report.status {
        RunStatus::Success => format!("\x1b[32msuccess{RESET}"),
        RunStatus::PartialSuccess => format!("\x1b[33mpartial success{RESET}"),
        RunStatus::Error => format!("\x1b[31merror{RESET}"),
    };
    out.push_str(&format!("Status: {status}\n"));

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render_contains_sections() {
        let out = render(&test_report()).expect("render text");
        assert!(out.contains("Refactory Analysis"));
        assert!(out.contains("SMELLS"));
        assert!(out.contains("God Class"));
        assert!(out.contains("SUGGESTIONS"));
        assert!(out.contains("Extract Class"));
        assert!(out.contains("Status:"));
    }

    #[test]
    fn test_text_render_empty_report() {
        let out = render(&RunReport::default()).expect("render text");
        assert!(out.contains("No design smells detected"));
        assert!(!out.contains("SUGGESTIONS"));
    }
}
