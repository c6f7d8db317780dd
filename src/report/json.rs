//! JSON rendering for analysis reports.

use super::AnalysisReport;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a report to JSON.
pub fn to_json(report: &AnalysisReport, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(report),
        JsonFormat::Compact => serde_json::to_string(report),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{assess_page, AnalyzerOptions};
    use crate::model::Page;

    fn report() -> AnalysisReport {
        let a = assess_page(&Page::new(0, 960.0, 912.0), &AnalyzerOptions::default());
        AnalysisReport::new(&[a], None)
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"utilizationPercent\": 105"));
        assert!(json.contains("\"status\": \"overflow\""));
        assert!(json.contains("\"fixesApplied\": []"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.contains("\"generatedAt\""));
    }
}
