//! Feature Envy Detector
//!
//! Detects methods that reference imported types more than a method its
//! size plausibly should, indicating the behavior may belong in the other
//! class. This is a textual proxy for low cohesion, not a call-graph
//! analysis: every word-boundary occurrence of an imported simple type name
//! inside the method body counts as one external reference.

use crate::config::Thresholds;
use crate::detectors::base::Detector;
use crate::detectors::methods;
use crate::models::{DetectionMethod, Severity, Smell};
use crate::scanner::SourceFile;
use anyhow::Result;
use regex::Regex;
use std::collections::BTreeSet;

/// Detects methods leaning heavily on other classes' symbols
pub struct FeatureEnvyDetector {
    max_external_refs: usize,
    min_method_lines: usize,
}

impl FeatureEnvyDetector {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_external_refs: thresholds.max_external_refs,
            min_method_lines: thresholds.min_method_lines,
        }
    }

    fn external_refs(body: &str, imports: &BTreeSet<String>) -> usize {
        let mut refs = 0;
        for name in imports {
            // Escape is defensive only: import names are \w+ by construction
            let pattern = format!(r"\b{}\b", regex::escape(name));
            if let Ok(re) = Regex::new(&pattern) {
                refs += re.find_iter(body).count();
            }
        }
        refs
    }
}

impl Detector for FeatureEnvyDetector {
    fn name(&self) -> &'static str {
        "FeatureEnvyDetector"
    }

    fn description(&self) -> &'static str {
        "Detects methods that reference imported types excessively"
    }

    fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>> {
        let imports: BTreeSet<String> =
            methods::imported_types(&file.content).into_iter().collect();
        if imports.is_empty() {
            return Ok(Vec::new());
        }

        let lines: Vec<&str> = file.content.lines().collect();
        let mut smells = Vec::new();

        for method in methods::scan_methods(&lines) {
            if method.span_lines() <= self.min_method_lines {
                continue;
            }

            let body = lines[method.line_start - 1..method.line_end].join("\n");
            let refs = Self::external_refs(&body, &imports);
            if refs <= self.max_external_refs {
                continue;
            }

            smells.push(Smell {
                smell_type: "Feature Envy".to_string(),
                file_path: file.rel_path.clone(),
                location: format!("{}()", method.name),
                line_start: method.line_start as u32,
                line_end: method.line_end as u32,
                severity: Severity::Medium,
                description: format!(
                    "Method '{}' references {} external class symbols. \
                     It may belong in another class.",
                    method.name, refs
                ),
                detection_method: DetectionMethod::Static,
            });
        }

        Ok(smells)
    }
}
