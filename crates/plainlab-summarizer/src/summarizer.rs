//! Core summarizer implementation

use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::template;
use plainlab_domain::traits::LlmProvider;
use plainlab_domain::VerifiedObservation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Default timeout for one summary generation (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Plain-language explanation for one test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// The explanation text
    pub text: String,

    /// Name of the test the explanation belongs to
    pub test_name: String,
}

/// Summarization result: overall summary plus one explanation per test,
/// in observation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// One/two-sentence overall summary
    pub summary: String,

    /// One explanation per observation, aligned by position and name
    pub explanations: Vec<Explanation>,

    /// Whether any part fell back to templates; logged, never surfaced
    pub degraded: bool,
}

/// The summarizer produces patient-friendly text over verified observations
///
/// Infallible by design: when the engine cannot be used, output degrades to
/// status-based templates instead of failing the request.
pub struct Summarizer<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    timeout_secs: u64,
}

impl<L> Summarizer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new summarizer
    pub fn new(llm_provider: Arc<L>) -> Self {
        Self {
            llm_provider,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the generation timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Summarize verified observations
    ///
    /// Explanations come back aligned to observation order; any the engine
    /// failed to provide are filled from templates.
    pub async fn summarize(&self, observations: &[VerifiedObservation]) -> Summary {
        let prompt = PromptBuilder::new(observations).build();
        debug!(prompt_len = prompt.len(), "built summary prompt");

        let payload = match timeout(
            Duration::from_secs(self.timeout_secs),
            self.call_llm(prompt),
        )
        .await
        {
            Ok(Ok(response)) => parse_response(&response),
            Ok(Err(reason)) => {
                warn!(%reason, "summary generation failed; falling back to templates");
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout_secs,
                    "summary generation timed out; falling back to templates"
                );
                None
            }
        };

        match payload {
            Some(payload) => self.align(observations, payload),
            None => Summary {
                summary: template::summary_for(observations),
                explanations: observations
                    .iter()
                    .map(|o| Explanation {
                        text: template::explanation_for(o),
                        test_name: o.name.clone(),
                    })
                    .collect(),
                degraded: true,
            },
        }
    }

    /// Align engine explanations to observation order, filling gaps
    fn align(
        &self,
        observations: &[VerifiedObservation],
        payload: crate::parser::SummaryPayload,
    ) -> Summary {
        let mut degraded = false;

        let explanations = observations
            .iter()
            .map(|observation| {
                let found = payload
                    .explanations
                    .iter()
                    .find(|e| e.test_name.eq_ignore_ascii_case(&observation.name));

                match found {
                    Some(explanation) => Explanation {
                        text: explanation.text.clone(),
                        test_name: observation.name.clone(),
                    },
                    None => {
                        degraded = true;
                        Explanation {
                            text: template::explanation_for(observation),
                            test_name: observation.name.clone(),
                        }
                    }
                }
            })
            .collect();

        if degraded {
            warn!("engine returned fewer explanations than observations; filled from templates");
        } else {
            info!(count = observations.len(), "summary generated");
        }

        Summary {
            summary: payload.summary,
            explanations,
            degraded,
        }
    }

    /// Call the generation engine on a blocking thread
    async fn call_llm(&self, prompt: String) -> Result<String, String> {
        let llm = Arc::clone(&self.llm_provider);

        tokio::task::spawn_blocking(move || llm.generate(&prompt).map_err(|e| e.to_string()))
            .await
            .map_err(|e| format!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plainlab_domain::TestStatus;
    use plainlab_llm::MockProvider;

    fn verified(name: &str, value: f64, status: TestStatus) -> VerifiedObservation {
        VerifiedObservation {
            name: name.to_string(),
            value,
            unit: Some("g/dL".to_string()),
            status,
            ref_range: None,
        }
    }

    #[tokio::test]
    async fn test_summarize_uses_engine_output() {
        let response = r#"{
            "summary": "Your hemoglobin is a bit low.",
            "explanations": [
                {"text": "Low hemoglobin can make you feel tired.", "test_name": "Hemoglobin"}
            ]
        }"#;
        let summarizer = Summarizer::new(Arc::new(MockProvider::new(response)));

        let observations = vec![verified("Hemoglobin", 10.2, TestStatus::Low)];
        let summary = summarizer.summarize(&observations).await;

        assert_eq!(summary.summary, "Your hemoglobin is a bit low.");
        assert_eq!(summary.explanations.len(), 1);
        assert!(!summary.degraded);
    }

    #[tokio::test]
    async fn test_missing_explanations_filled_from_templates() {
        // Engine explains one of two tests
        let response = r#"{
            "summary": "Mixed results.",
            "explanations": [
                {"text": "Low hemoglobin can make you feel tired.", "test_name": "Hemoglobin"}
            ]
        }"#;
        let summarizer = Summarizer::new(Arc::new(MockProvider::new(response)));

        let observations = vec![
            verified("Hemoglobin", 10.2, TestStatus::Low),
            verified("WBC", 11200.0, TestStatus::High),
        ];
        let summary = summarizer.summarize(&observations).await;

        assert_eq!(summary.explanations.len(), 2);
        assert_eq!(summary.explanations[1].test_name, "WBC");
        assert!(summary.explanations[1].text.contains("above the typical range"));
        assert!(summary.degraded);
    }

    #[tokio::test]
    async fn test_explanations_follow_observation_order() {
        // Engine returns explanations in reverse order
        let response = r#"{
            "summary": "Mixed results.",
            "explanations": [
                {"text": "About WBC.", "test_name": "WBC"},
                {"text": "About hemoglobin.", "test_name": "Hemoglobin"}
            ]
        }"#;
        let summarizer = Summarizer::new(Arc::new(MockProvider::new(response)));

        let observations = vec![
            verified("Hemoglobin", 10.2, TestStatus::Low),
            verified("WBC", 11200.0, TestStatus::High),
        ];
        let summary = summarizer.summarize(&observations).await;

        assert_eq!(summary.explanations[0].test_name, "Hemoglobin");
        assert_eq!(summary.explanations[1].test_name, "WBC");
        assert!(!summary.degraded);
    }

    #[tokio::test]
    async fn test_engine_failure_degrades_to_templates() {
        let summarizer = Summarizer::new(Arc::new(MockProvider::failing()));

        let observations = vec![
            verified("Hemoglobin", 10.2, TestStatus::Low),
            verified("Glucose", 98.0, TestStatus::Normal),
        ];
        let summary = summarizer.summarize(&observations).await;

        assert!(summary.degraded);
        assert_eq!(summary.explanations.len(), 2);
        assert!(summary.summary.contains("1 of your 2"));
    }

    #[tokio::test]
    async fn test_malformed_engine_output_degrades_to_templates() {
        let summarizer = Summarizer::new(Arc::new(MockProvider::new("not json at all")));

        let observations = vec![verified("Hemoglobin", 10.2, TestStatus::Low)];
        let summary = summarizer.summarize(&observations).await;

        assert!(summary.degraded);
        assert_eq!(summary.explanations.len(), 1);
    }
}
