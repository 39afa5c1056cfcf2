//! God class detector - finds classes that do too much
//!
//! A class with too many methods or too many fields violates the Single
//! Responsibility Principle and is difficult to understand, test, and
//! maintain.

use crate::config::Thresholds;
use crate::detectors::base::Detector;
use crate::detectors::methods;
use crate::models::{DetectionMethod, Severity, Smell};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Detects classes with too many methods or fields
pub struct GodClassDetector {
    max_methods: usize,
    max_fields: usize,
}

impl GodClassDetector {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_methods: thresholds.max_methods,
            max_fields: thresholds.max_fields,
        }
    }

    fn severity(&self, method_count: usize) -> Severity {
        if method_count as f64 > self.max_methods as f64 * 1.5 {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

impl Detector for GodClassDetector {
    fn name(&self) -> &'static str {
        "GodClassDetector"
    }

    fn description(&self) -> &'static str {
        "Detects classes with too many methods or fields"
    }

    fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>> {
        let lines: Vec<&str> = file.content.lines().collect();
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let method_count = methods::scan_methods(&lines).len();
        let field_count = methods::count_fields(&lines);

        if method_count <= self.max_methods && field_count <= self.max_fields {
            return Ok(Vec::new());
        }

        // Interface-only files still get class-level records
        let (location, decl_line) = methods::first_type_declaration(&lines)
            .unwrap_or_else(|| (file_stem(&file.rel_path), 1));

        Ok(vec![Smell {
            smell_type: "God Class".to_string(),
            file_path: file.rel_path.clone(),
            location,
            line_start: decl_line as u32,
            line_end: lines.len() as u32,
            severity: self.severity(method_count),
            description: format!(
                "Class has {} methods and {} fields. \
                 Consider splitting into smaller, focused classes.",
                method_count, field_count
            ),
            detection_method: DetectionMethod::Static,
        }])
    }
}

pub(crate) fn file_stem(rel_path: &str) -> String {
    std::path::Path::new(rel_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(rel_path)
        .to_string()
}
