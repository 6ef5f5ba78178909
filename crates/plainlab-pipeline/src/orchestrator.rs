//! Pipeline orchestration

use crate::error::{Stage, StageFailure};
use crate::result::PipelineResult;
use plainlab_domain::traits::{LlmProvider, TextSource};
use plainlab_domain::{ExtractedText, MediaKind, ObservationBatch};
use plainlab_extractor::{ExtractorError, TestExtractor};
use plainlab_guard::HallucinationGuard;
use plainlab_summarizer::Summarizer;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Raw report payload, owned by one pipeline run
#[derive(Debug, Clone)]
pub struct RawInput {
    /// Raw bytes of the uploaded report
    pub bytes: Vec<u8>,

    /// Declared media kind
    pub kind: MediaKind,
}

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Runs whose recognized text scores below this confidence are refused
    pub min_text_confidence: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_text_confidence: 0.3,
        }
    }
}

/// One pipeline per service; one run per request
///
/// Every component is stateless with respect to a request, so a single
/// `Pipeline` value serves any number of concurrent runs with no shared
/// mutable state and no locks.
pub struct Pipeline<T, L>
where
    T: TextSource,
    L: LlmProvider,
{
    text_source: Arc<T>,
    extractor: TestExtractor<L>,
    guard: HallucinationGuard,
    summarizer: Summarizer<L>,
    config: PipelineConfig,
}

impl<T, L> Pipeline<T, L>
where
    T: TextSource + Send + Sync + 'static,
    L: LlmProvider + Send + Sync + 'static,
    T::Error: std::fmt::Display + Send + 'static,
    L::Error: std::fmt::Display,
{
    /// Assemble a pipeline from its stages
    pub fn new(
        text_source: Arc<T>,
        extractor: TestExtractor<L>,
        guard: HallucinationGuard,
        summarizer: Summarizer<L>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            text_source,
            extractor,
            guard,
            summarizer,
            config,
        }
    }

    /// Run the full pipeline on one report
    ///
    /// Always yields exactly one result; terminal failures map to the
    /// `unprocessed` shape with a reason.
    pub async fn run(&self, input: RawInput) -> PipelineResult {
        match self.run_stages(input).await {
            Ok(result) => result,
            Err(failure) => {
                warn!(stage = %failure.stage(), reason = %failure, "pipeline run failed");
                PipelineResult::unprocessed(failure.to_string())
            }
        }
    }

    async fn run_stages(&self, input: RawInput) -> Result<PipelineResult, StageFailure> {
        debug!(stage = %Stage::Received, kind = ?input.kind, bytes = input.bytes.len(), "pipeline run started");

        // Received -> TextExtracted
        let extracted = self.recognize(input).await?;
        debug!(
            stage = %Stage::TextExtracted,
            confidence = extracted.confidence,
            text_len = extracted.text.len(),
            "text recognized"
        );

        // TextExtracted -> TestsExtracted
        let batch = self.extract(&extracted.text).await?;
        debug!(stage = %Stage::TestsExtracted, count = batch.len(), "observations extracted");

        // TestsExtracted -> Validated
        let verdict = self.guard.check(&batch, &extracted.text);
        if !verdict.accepted {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "batch rejected".to_string());
            return Err(StageFailure::ValidationRejected(reason));
        }
        debug!(stage = %Stage::Validated, "batch accepted");

        // Validated -> StatusResolved (pure, per item, in order)
        let verified = batch.resolve_all();
        debug!(stage = %Stage::StatusResolved, count = verified.len(), "statuses derived");

        // StatusResolved -> Summarized (recoverable; never fails the run)
        let summary = self.summarizer.summarize(&verified).await;
        debug!(stage = %Stage::Summarized, degraded = summary.degraded, "summary produced");

        info!(stage = %Stage::Done, tests = verified.len(), "pipeline run complete");

        Ok(PipelineResult::Ok {
            tests: verified,
            summary: summary.summary,
            explanations: summary.explanations,
        })
    }

    /// Drive the recognition engine on a blocking thread
    async fn recognize(&self, input: RawInput) -> Result<ExtractedText, StageFailure> {
        let source = Arc::clone(&self.text_source);
        let RawInput { bytes, kind } = input;

        let extracted = tokio::task::spawn_blocking(move || source.extract(&bytes, kind))
            .await
            .map_err(|e| StageFailure::InputUnreadable(format!("Task join error: {}", e)))?
            .map_err(|e| StageFailure::InputUnreadable(e.to_string()))?;

        if extracted.text.trim().is_empty() {
            return Err(StageFailure::InputUnreadable(
                "no text recognized in input".to_string(),
            ));
        }

        if extracted.confidence < self.config.min_text_confidence {
            return Err(StageFailure::InputUnreadable(format!(
                "recognition confidence too low: {:.2}",
                extracted.confidence
            )));
        }

        Ok(extracted)
    }

    /// Drive the extractor, mapping its errors into the failure taxonomy
    async fn extract(&self, text: &str) -> Result<ObservationBatch, StageFailure> {
        self.extractor.extract(text).await.map_err(|e| match e {
            ExtractorError::Timeout => StageFailure::GenerationTimeout,
            other => StageFailure::ExtractionFailed(other.to_string()),
        })
    }
}
