//! Batch validation logic

use crate::config::GuardConfig;
use crate::matcher;
use plainlab_domain::ObservationBatch;
use tracing::{info, warn};

/// Rejection reason surfaced to the caller when any observation fails
pub const HALLUCINATION_REASON: &str = "hallucinated tests not present in input";

/// Batch-level verdict; there is no per-item acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    /// Whether the whole batch is accepted
    pub accepted: bool,

    /// Rejection reason; `None` on acceptance
    pub reason: Option<String>,
}

impl ValidationVerdict {
    fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

/// The guard validates an extracted batch against its source text
pub struct HallucinationGuard {
    config: GuardConfig,
}

impl HallucinationGuard {
    /// Create a guard with the given configuration
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Create a guard with default configuration
    pub fn default_config() -> Self {
        Self::new(GuardConfig::default())
    }

    /// Check every observation in the batch against the source text
    ///
    /// Fail-closed: the first untraceable name or value rejects the whole
    /// batch. On acceptance the verdict carries no data and the batch
    /// proceeds unchanged.
    pub fn check(&self, batch: &ObservationBatch, source_text: &str) -> ValidationVerdict {
        let normalized_source = matcher::normalize(source_text);
        let source_numbers = matcher::numbers_in(source_text);

        for observation in batch {
            if self.config.check_names
                && !matcher::name_present(&observation.name, &normalized_source)
            {
                warn!(
                    name = %observation.name,
                    "observation name not traceable to source text"
                );
                return ValidationVerdict::rejected(HALLUCINATION_REASON);
            }

            if self.config.check_values
                && !matcher::value_present(
                    observation.value,
                    &source_numbers,
                    self.config.decimal_relative_tolerance,
                )
            {
                warn!(
                    name = %observation.name,
                    value = observation.value,
                    "observation value not traceable to source text"
                );
                return ValidationVerdict::rejected(HALLUCINATION_REASON);
            }
        }

        info!(count = batch.len(), "batch traceable to source text");
        ValidationVerdict::accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plainlab_domain::{Observation, RefRange};

    fn obs(name: &str, value: f64) -> Observation {
        Observation {
            name: name.to_string(),
            value,
            unit: None,
            ref_range: Some(RefRange::new(0.0, 100.0)),
            raw_status_hint: None,
        }
    }

    fn batch(observations: Vec<Observation>) -> ObservationBatch {
        ObservationBatch::new(observations).unwrap()
    }

    #[test]
    fn test_traceable_batch_accepted() {
        let guard = HallucinationGuard::default_config();
        let source = "CBC: Hemoglobin 10.2 g/dL (Low), WBC 11,200 /uL (High)";
        let verdict = guard.check(
            &batch(vec![obs("Hemoglobin", 10.2), obs("WBC", 11200.0)]),
            source,
        );

        assert!(verdict.accepted);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn test_fabricated_value_rejects_whole_batch() {
        let guard = HallucinationGuard::default_config();
        let source = "Hemoglobin 14.2 g/dL";
        // One good observation plus one with an invented value
        let verdict = guard.check(
            &batch(vec![obs("Hemoglobin", 14.2), obs("Hemoglobin", 99.9)]),
            source,
        );

        assert!(!verdict.accepted);
        assert!(verdict.reason.as_deref().unwrap().contains("hallucinated"));
    }

    #[test]
    fn test_fabricated_name_rejects_whole_batch() {
        let guard = HallucinationGuard::default_config();
        let source = "Hemoglobin 14.2 g/dL";
        let verdict = guard.check(&batch(vec![obs("Troponin I", 14.2)]), source);

        assert!(!verdict.accepted);
        assert_eq!(verdict.reason.as_deref(), Some(HALLUCINATION_REASON));
    }

    #[test]
    fn test_abbreviated_name_in_source_accepted() {
        let guard = HallucinationGuard::default_config();
        let source = "Hgb: 14.2 g/dL";
        let verdict = guard.check(&batch(vec![obs("Hemoglobin", 14.2)]), source);

        assert!(verdict.accepted);
    }

    #[test]
    fn test_comma_grouped_value_accepted() {
        let guard = HallucinationGuard::default_config();
        let source = "WBC count was 11,200 today";
        let verdict = guard.check(&batch(vec![obs("WBC", 11200.0)]), source);

        assert!(verdict.accepted);
    }

    #[test]
    fn test_no_partial_acceptance() {
        let guard = HallucinationGuard::default_config();
        let source = "Hemoglobin 14.2 g/dL, Glucose 98 mg/dL";
        let verdict = guard.check(
            &batch(vec![
                obs("Hemoglobin", 14.2),
                obs("Glucose", 98.0),
                obs("Sodium", 140.0),
            ]),
            source,
        );

        // Two of three are traceable; the verdict is still a whole-batch reject.
        assert!(!verdict.accepted);
    }
}
