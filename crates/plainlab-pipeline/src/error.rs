//! Pipeline stages and terminal failures

use thiserror::Error;

/// States of one pipeline run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw input accepted
    Received,
    /// Text recognized from the input
    TextExtracted,
    /// Candidate observations extracted
    TestsExtracted,
    /// Hallucination guard accepted the batch
    Validated,
    /// Statuses derived for every observation
    StatusResolved,
    /// Summary and explanations produced
    Summarized,
    /// Result constructed
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::TextExtracted => "text_extraction",
            Stage::TestsExtracted => "test_extraction",
            Stage::Validated => "validation",
            Stage::StatusResolved => "status_resolution",
            Stage::Summarized => "summarization",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Terminal failure of a pipeline run
///
/// Reachable from any state; there is no recovery and no automatic retry.
/// `ValidationRejected` is a designed business outcome rather than an
/// exception path, but it terminates the run all the same.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageFailure {
    /// Recognition failed, or recognized text is empty/too low-confidence
    #[error("input unreadable: {0}")]
    InputUnreadable(String),

    /// No parseable, non-empty observation list came out of the engine
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// The extraction engine call exceeded its bounded timeout
    #[error("generation engine timed out during extraction")]
    GenerationTimeout,

    /// The hallucination guard rejected the batch
    #[error("{0}")]
    ValidationRejected(String),
}

impl StageFailure {
    /// The stage this failure occurred in
    pub fn stage(&self) -> Stage {
        match self {
            StageFailure::InputUnreadable(_) => Stage::TextExtracted,
            StageFailure::ExtractionFailed(_) | StageFailure::GenerationTimeout => {
                Stage::TestsExtracted
            }
            StageFailure::ValidationRejected(_) => Stage::Validated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_maps_to_stage() {
        assert_eq!(
            StageFailure::InputUnreadable("x".into()).stage(),
            Stage::TextExtracted
        );
        assert_eq!(
            StageFailure::GenerationTimeout.stage(),
            Stage::TestsExtracted
        );
        assert_eq!(
            StageFailure::ValidationRejected("x".into()).stage(),
            Stage::Validated
        );
    }

    #[test]
    fn test_validation_reason_passes_through_verbatim() {
        let failure =
            StageFailure::ValidationRejected("hallucinated tests not present in input".into());
        assert_eq!(
            failure.to_string(),
            "hallucinated tests not present in input"
        );
    }

    #[test]
    fn test_stage_display_names() {
        assert_eq!(Stage::Validated.to_string(), "validation");
        assert_eq!(Stage::TestsExtracted.to_string(), "test_extraction");
    }
}
