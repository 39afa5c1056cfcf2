//! Core data models for Refactory
//!
//! These models are used throughout the codebase for representing
//! detected smells, file metrics, and refactoring suggestions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity levels for detected smells
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// How a smell was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    #[default]
    Static,
    Llm,
}

/// A detected design smell
///
/// Immutable once created. Smells are appended in file-scan order and,
/// within a file, in structural discovery order (class-level rules before
/// method-level rules, methods in declaration order).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Smell {
    #[serde(default)]
    pub smell_type: String,
    #[serde(default)]
    pub file_path: String,
    /// Class or method name the smell points at
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub line_start: u32,
    #[serde(default)]
    pub line_end: u32,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detection_method: DetectionMethod,
}

/// Per-file metrics gathered during detection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileMetrics {
    pub file_path: String,
    pub total_lines: usize,
    pub method_count: usize,
    pub field_count: usize,
    pub class_count: usize,
    pub max_method_length: usize,
    pub max_parameter_count: usize,
}

/// A refactoring suggestion parsed from an LLM response
///
/// Created by the response parser with an empty `id` and a batch-local
/// `smell_index`; the pipeline assigns the id and rewrites the index into
/// the run's smell list when it accepts a suggestion. A smell carries at
/// most one suggestion per run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Suggestion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub smell_index: usize,
    #[serde(default)]
    pub smell_type: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub technique: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub original_snippet: String,
    #[serde(default)]
    pub suggested_code: String,
    #[serde(default)]
    pub changes_summary: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
}

/// Summary of smells by severity and type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmellSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl SmellSummary {
    pub fn from_smells(smells: &[Smell]) -> Self {
        let mut summary = Self::default();
        for s in smells {
            match s.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            *summary.by_type.entry(s.smell_type.clone()).or_insert(0) += 1;
            summary.total += 1;
        }
        summary
    }
}

/// Overall outcome of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Success,
    PartialSuccess,
    Error,
}

/// Full result of one pipeline run
///
/// The run always completes and carries whatever was successfully computed.
/// `errors` lists every contained per-file and per-batch failure so partial
/// results are distinguishable from complete ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub timestamp: String,
    pub repo_path: String,
    pub files_scanned: usize,
    pub total_lines: usize,
    pub smells: Vec<Smell>,
    pub metrics: Vec<FileMetrics>,
    pub summary: SmellSummary,
    pub suggestions: Vec<Suggestion>,
    pub errors: Vec<String>,
}

impl RunReport {
    /// Downgrade status once any contained error has been recorded.
    pub fn finalize_status(&mut self) {
        if !self.errors.is_empty() && self.status == RunStatus::Success {
            self.status = RunStatus::PartialSuccess;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"HIGH\"");
        let s: Severity = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(s, Severity::Medium);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_summary_counts() {
        let smells = vec![
            Smell {
                smell_type: "God Class".into(),
                severity: Severity::High,
                ..Default::default()
            },
            Smell {
                smell_type: "Long Method".into(),
                severity: Severity::Medium,
                ..Default::default()
            },
            Smell {
                smell_type: "Long Method".into(),
                severity: Severity::Medium,
                ..Default::default()
            },
        ];
        let summary = SmellSummary::from_smells(&smells);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 2);
        assert_eq!(summary.by_type["Long Method"], 2);
    }

    #[test]
    fn test_finalize_status() {
        let mut report = RunReport::default();
        report.finalize_status();
        assert_eq!(report.status, RunStatus::Success);

        report.errors.push("batch 2: malformed response".into());
        report.finalize_status();
        assert_eq!(report.status, RunStatus::PartialSuccess);
    }
}
