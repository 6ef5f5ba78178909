//! Error types for the extractor

use thiserror::Error;

/// Errors that can occur during observation extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Generation engine error
    #[error("Engine error: {0}")]
    Llm(String),

    /// Report text exceeds the configured maximum length
    #[error("Report text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Engine call exceeded the extraction timeout
    #[error("Extraction timed out")]
    Timeout,

    /// Engine output could not be parsed as an observation array, even
    /// after one repair pass
    #[error("Invalid extraction format: {0}")]
    InvalidFormat(String),

    /// Engine output parsed, but yielded no usable observation
    #[error("No observations extracted from report text")]
    NoObservations,
}
