//! Core extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use plainlab_domain::traits::LlmProvider;
use plainlab_domain::ObservationBatch;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// The extractor turns report text into a batch of candidate observations
///
/// Stateless with respect to a single request; safe to invoke concurrently
/// from multiple pipeline instances.
pub struct TestExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> TestExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new extractor
    pub fn new(llm_provider: Arc<L>, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Extract candidate observations from report text
    ///
    /// The engine call runs under the configured timeout. Order of the
    /// returned batch is the engine's output order, which the prompt pins
    /// to mention order in the report.
    pub async fn extract(&self, text: &str) -> Result<ObservationBatch, ExtractorError> {
        if text.len() > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text.len(),
                self.config.max_text_length,
            ));
        }

        info!(text_len = text.len(), "starting observation extraction");

        let prompt = PromptBuilder::new(text.to_string()).build();
        debug!(prompt_len = prompt.len(), "built extraction prompt");

        let llm_response = timeout(self.config.extraction_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| ExtractorError::Timeout)??;

        debug!(response_len = llm_response.len(), "engine responded");

        let observations = parse_response(&llm_response)?;

        info!(count = observations.len(), "parsed candidate observations");

        ObservationBatch::new(observations).map_err(|_| ExtractorError::NoObservations)
    }

    /// Call the generation engine on a blocking thread
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plainlab_llm::MockProvider;

    fn extractor_with(response: &str) -> TestExtractor<MockProvider> {
        TestExtractor::new(
            Arc::new(MockProvider::new(response)),
            ExtractorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_extract_parses_engine_output() {
        let extractor = extractor_with(
            r#"[{"name": "Hemoglobin", "value": 10.2, "unit": "g/dL",
                 "ref_range": {"low": 12.0, "high": 17.0}, "status": "low"}]"#,
        );

        let batch = extractor.extract("Hemoglobin 10.2 g/dL (Low)").await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.as_slice()[0].name, "Hemoglobin");
    }

    #[tokio::test]
    async fn test_extract_empty_response_fails() {
        let extractor = extractor_with("[]");
        let result = extractor.extract("Some report text").await;
        assert!(matches!(result, Err(ExtractorError::NoObservations)));
    }

    #[tokio::test]
    async fn test_extract_garbage_response_fails() {
        let extractor = extractor_with("no tests found, sorry");
        let result = extractor.extract("Some report text").await;
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_extract_text_too_long() {
        let extractor = extractor_with("[]");
        let long_text = "a".repeat(100_000);

        let result = extractor.extract(&long_text).await;
        assert!(matches!(result, Err(ExtractorError::TextTooLong(_, _))));
    }

    #[tokio::test]
    async fn test_extract_engine_failure_propagates() {
        let extractor = TestExtractor::new(
            Arc::new(MockProvider::failing()),
            ExtractorConfig::default(),
        );

        let result = extractor.extract("Some report text").await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }
}
