//! JSON reporter
//!
//! Outputs the full RunReport as pretty-printed JSON for machine
//! consumption or piping to jq.

use crate::models::RunReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["status"], "success");
        assert_eq!(parsed["files_scanned"], 12);
        assert_eq!(
            parsed["smells"].as_array().expect("smells array").len(),
            2
        );
        assert_eq!(parsed["smells"][0]["severity"], "HIGH");
    }

    #[test]
    fn test_json_round_trips_into_report() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let back: RunReport = serde_json::from_str(&json_str).expect("parse report");
        assert_eq!(back.smells.len(), report.smells.len());
        assert_eq!(back.suggestions.len(), report.suggestions.len());
    }
}
