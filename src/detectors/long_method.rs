//! Long method detector
//!
//! Flags methods whose brace-balanced span exceeds the configured budget.

use crate::config::Thresholds;
use crate::detectors::base::Detector;
use crate::detectors::methods;
use crate::models::{DetectionMethod, Severity, Smell};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Detects methods that are too long
pub struct LongMethodDetector {
    max_lines: usize,
}

impl LongMethodDetector {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_lines: thresholds.max_lines_per_method,
        }
    }
}

impl Detector for LongMethodDetector {
    fn name(&self) -> &'static str {
        "LongMethodDetector"
    }

    fn description(&self) -> &'static str {
        "Detects methods whose body span exceeds the line budget"
    }

    fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>> {
        let lines: Vec<&str> = file.content.lines().collect();
        let mut smells = Vec::new();

        for method in methods::scan_methods(&lines) {
            let span = method.span_lines();
            if span <= self.max_lines {
                continue;
            }

            let severity = if span > self.max_lines * 2 {
                Severity::High
            } else {
                Severity::Medium
            };

            smells.push(Smell {
                smell_type: "Long Method".to_string(),
                file_path: file.rel_path.clone(),
                location: format!("{}()", method.name),
                line_start: method.line_start as u32,
                line_end: method.line_end as u32,
                severity,
                description: format!(
                    "Method '{}' is {} lines (threshold: {}). \
                     Consider extracting sub-methods.",
                    method.name, span, self.max_lines
                ),
                detection_method: DetectionMethod::Static,
            });
        }

        Ok(smells)
    }
}
