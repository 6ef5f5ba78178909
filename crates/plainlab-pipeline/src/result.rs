//! Terminal result shapes

use plainlab_domain::VerifiedObservation;
use plainlab_summarizer::Explanation;
use serde::{Deserialize, Serialize};

/// Terminal result of one pipeline run
///
/// Immutable once constructed; serialized to the caller and then discarded.
/// A rejected or failed run never carries a partial test list — `tests` is
/// only present, and only fully verified, under `ok`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PipelineResult {
    /// The report was processed end to end
    Ok {
        /// Verified observations, in mention order
        tests: Vec<VerifiedObservation>,
        /// One/two-sentence overall summary
        summary: String,
        /// One explanation per test, aligned with `tests` by position and
        /// by `test_name`
        explanations: Vec<Explanation>,
    },

    /// The report could not be processed; a designed outcome, not a
    /// transport error
    Unprocessed {
        /// Human-readable reason
        reason: String,
    },
}

impl PipelineResult {
    /// Construct the unprocessed shape
    pub fn unprocessed(reason: impl Into<String>) -> Self {
        PipelineResult::Unprocessed {
            reason: reason.into(),
        }
    }

    /// Whether this is the `ok` shape
    pub fn is_ok(&self) -> bool {
        matches!(self, PipelineResult::Ok { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plainlab_domain::{RefRange, TestStatus};

    #[test]
    fn test_ok_shape_serialization() {
        let result = PipelineResult::Ok {
            tests: vec![VerifiedObservation {
                name: "Hemoglobin".to_string(),
                value: 10.2,
                unit: Some("g/dL".to_string()),
                status: TestStatus::Low,
                ref_range: Some(RefRange::new(12.0, 17.0)),
            }],
            summary: "Your hemoglobin is low.".to_string(),
            explanations: vec![Explanation {
                text: "Low hemoglobin can make you feel tired.".to_string(),
                test_name: "Hemoglobin".to_string(),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["tests"][0]["name"], "Hemoglobin");
        assert_eq!(json["tests"][0]["status"], "low");
        assert_eq!(json["tests"][0]["ref_range"]["low"], 12.0);
        assert_eq!(json["explanations"][0]["test_name"], "Hemoglobin");
    }

    #[test]
    fn test_unprocessed_shape_serialization() {
        let result = PipelineResult::unprocessed("hallucinated tests not present in input");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "unprocessed");
        assert_eq!(json["reason"], "hallucinated tests not present in input");
        assert!(json.get("tests").is_none());
    }

    #[test]
    fn test_round_trip() {
        let result = PipelineResult::unprocessed("no tests extracted");
        let json = serde_json::to_string(&result).unwrap();
        let back: PipelineResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
