//! Runs every smell rule over each scanned file
//!
//! Rules run in a fixed order (class-level before method-level) so records
//! land in structural discovery order within a file. Rule failures are
//! contained: a rule that errors on one file contributes nothing for that
//! file and the run continues.

use crate::config::Thresholds;
use crate::detectors::base::Detector;
use crate::detectors::feature_envy::FeatureEnvyDetector;
use crate::detectors::god_class::GodClassDetector;
use crate::detectors::large_class::LargeClassDetector;
use crate::detectors::long_method::LongMethodDetector;
use crate::detectors::long_parameter_list::LongParameterListDetector;
use crate::detectors::methods;
use crate::models::{FileMetrics, Smell};
use crate::scanner::SourceFile;
use tracing::{debug, warn};

/// The fixed rule set applied to every file
pub struct SmellEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl SmellEngine {
    pub fn new(thresholds: &Thresholds) -> Self {
        // Class-level rules first, then method-level, matching the
        // documented within-file record ordering.
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(GodClassDetector::new(thresholds)),
            Box::new(LargeClassDetector::new(thresholds)),
            Box::new(LongMethodDetector::new(thresholds)),
            Box::new(LongParameterListDetector::new(thresholds)),
            Box::new(FeatureEnvyDetector::new(thresholds)),
        ];
        Self { detectors }
    }

    /// Run all rules against one file. Never fails: rule errors are logged
    /// and that rule yields nothing for the file.
    pub fn detect(&self, file: &SourceFile) -> Vec<Smell> {
        let mut smells = Vec::new();
        for detector in &self.detectors {
            match detector.detect(file) {
                Ok(found) => {
                    if !found.is_empty() {
                        debug!(
                            "{}: {} record(s) in {}",
                            detector.name(),
                            found.len(),
                            file.rel_path
                        );
                    }
                    smells.extend(found);
                }
                Err(e) => {
                    warn!(
                        "{} failed on {}: {} (skipping)",
                        detector.name(),
                        file.rel_path,
                        e
                    );
                }
            }
        }
        smells
    }

    /// Structural metrics for one file, from the same heuristic scan the
    /// rules use.
    pub fn metrics(&self, file: &SourceFile) -> FileMetrics {
        let lines: Vec<&str> = file.content.lines().collect();
        let scanned = methods::scan_methods(&lines);
        let class_count = lines
            .iter()
            .filter(|l| {
                let t = l.trim_start();
                !t.starts_with("//")
                    && (t.starts_with("public class ")
                        || t.starts_with("class ")
                        || t.starts_with("public interface ")
                        || t.starts_with("interface "))
            })
            .count();

        FileMetrics {
            file_path: file.rel_path.clone(),
            total_lines: lines.len(),
            method_count: scanned.len(),
            field_count: methods::count_fields(&lines),
            class_count,
            max_method_length: scanned.iter().map(|m| m.span_lines()).max().unwrap_or(0),
            max_parameter_count: scanned.iter().map(|m| m.param_count()).max().unwrap_or(0),
        }
    }
}
