//! Long parameter list detector

use crate::config::Thresholds;
use crate::detectors::base::Detector;
use crate::detectors::methods;
use crate::models::{DetectionMethod, Severity, Smell};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Detects methods with too many parameters
pub struct LongParameterListDetector {
    max_params: usize,
}

impl LongParameterListDetector {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_params: thresholds.max_params,
        }
    }
}

impl Detector for LongParameterListDetector {
    fn name(&self) -> &'static str {
        "LongParameterListDetector"
    }

    fn description(&self) -> &'static str {
        "Detects methods with too many parameters"
    }

    fn detect(&self, file: &SourceFile) -> Result<Vec<Smell>> {
        let lines: Vec<&str> = file.content.lines().collect();
        let mut smells = Vec::new();

        for method in methods::scan_methods(&lines) {
            let param_count = method.param_count();
            if param_count <= self.max_params {
                continue;
            }

            smells.push(Smell {
                smell_type: "Long Parameter List".to_string(),
                file_path: file.rel_path.clone(),
                location: format!("{}()", method.name),
                line_start: method.line_start as u32,
                line_end: method.line_start as u32,
                severity: Severity::Medium,
                description: format!(
                    "Method '{}' has {} parameters (threshold: {}). \
                     Consider introducing a Parameter Object.",
                    method.name, param_count, self.max_params
                ),
                detection_method: DetectionMethod::Static,
            });
        }

        Ok(smells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_with_params(n: usize) -> SourceFile {
        let params: Vec<String> = (0..n).map(|i| format!("int p{}", i)).collect();
        let src = format!(
            "public class X {{\n    public void call({}) {{\n    }}\n}}\n",
            params.join(", ")
        );
        SourceFile::new("src/X.java", src)
    }

    fn detector() -> LongParameterListDetector {
        LongParameterListDetector::new(&Thresholds::default())
    }

    #[test]
    fn test_exactly_max_params_never_fires() {
        assert!(detector().detect(&method_with_params(5)).unwrap().is_empty());
    }

    #[test]
    fn test_fires_strictly_above_max_params() {
        let smells = detector().detect(&method_with_params(6)).unwrap();
        assert_eq!(smells.len(), 1);
        assert_eq!(smells[0].severity, Severity::Medium);
        assert_eq!(smells[0].location, "call()");
        assert_eq!(smells[0].line_start, smells[0].line_end);
    }

    #[test]
    fn test_no_params_quiet() {
        assert!(detector().detect(&method_with_params(0)).unwrap().is_empty());
    }
}
