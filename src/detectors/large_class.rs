//! Large class detector - flags files whose total line count is excessive

use crate::config::Thresholds;
use crate::detectors::base::Detector;
use crate::detectors::god_class::file_stem;
use crate::models::{DetectionMethod, Severity, Smell};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Detects files exceeding the configured line budget
pub struct LargeClassDetector {
    max_lines: usize,
    high_lines: usize,
}

impl LargeClassDetector {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_lines: thresholds.max_lines,
            high_lines: thresholds.high_lines,
        }
    }
}

impl Detector for LargeClassDetector {
    fn name(&self) -> &'static str {
        "LargeClassDetector"
    }

    fn description(&self) -> &'static str {
        "Detects files with an excessive total line count"
    }

    fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>> {
        let total_lines = file.line_count();
        if total_lines <= self.max_lines {
            return Ok(Vec::new());
        }

        let severity = if total_lines > self.high_lines {
            Severity::High
        } else {
            Severity::Medium
        };

        Ok(vec![Smell {
            smell_type: "Large Class".to_string(),
            file_path: file.rel_path.clone(),
            location: file_stem(&file.rel_path),
            line_start: 1,
            line_end: total_lines as u32,
            severity,
            description: format!(
                "File has {} lines. Consider breaking into smaller classes.",
                total_lines
            ),
            detection_method: DetectionMethod::Static,
        }])
    }
}
