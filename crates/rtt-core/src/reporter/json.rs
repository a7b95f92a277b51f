//! JSON reporter

use anyhow::Result;
use serde::Serialize;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Serialize `value`, pretty-printed if requested
    pub fn format<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::ledger::History;
    use crate::reporter::fixtures;

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&fixtures::analysis(true), false).unwrap();

        assert!(!output.contains('\n'));
        assert!(output.contains("\"samples_ok\":5"));
        assert!(output.contains("\"change\":20.0"));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&fixtures::history(), true).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("\"all_rows\""));
        assert!(output.contains("\"p90_ms\": null"));
    }

    #[test]
    fn test_json_roundtrip() {
        let result = fixtures::analysis(true);
        let json = JsonReporter::format(&result, false).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);

        let history = fixtures::history();
        let json = JsonReporter::format(&history, false).unwrap();
        let parsed: History = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history);
    }
}
