//! PlainLab Text-Recognition Layer
//!
//! Implements the `TextSource` seam: raw report bytes in, recognized text
//! plus a confidence score out. Typed text passes through untouched at
//! confidence 1.0. Images are read by a local vision model over the Ollama
//! API. PDFs are decomposed into per-page images first, then each page is
//! recognized separately and confidences are averaged.
//!
//! Vision models report no per-word confidence, so confidence for
//! recognized pages is a documented text-quality heuristic (see
//! [`confidence`]).

#![warn(missing_docs)]

pub mod confidence;
pub mod pdf;
pub mod vision;

use plainlab_domain::traits::TextSource;
use plainlab_domain::{ExtractedText, MediaKind};
use thiserror::Error;

pub use vision::OllamaVisionSource;

/// Errors that can occur during text recognition
#[derive(Error, Debug)]
pub enum OcrError {
    /// Network or API communication error with the vision engine
    #[error("Vision engine error: {0}")]
    Engine(String),

    /// Vision engine call exceeded its bounded timeout
    #[error("Recognition timed out after {0} seconds")]
    Timeout(u64),

    /// Uploaded bytes declared as text are not valid UTF-8
    #[error("Text payload is not valid UTF-8")]
    InvalidEncoding,

    /// PDF could not be parsed or contains no page images
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Embedded page image could not be decoded
    #[error("Image error: {0}")]
    Image(String),
}

/// Mock text source for deterministic testing
///
/// Returns a pre-configured result without touching any engine.
#[derive(Debug, Clone)]
pub struct MockTextSource {
    result: Result<ExtractedText, String>,
}

impl MockTextSource {
    /// Create a mock returning the given text and confidence
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            result: Ok(ExtractedText::new(text, confidence)),
        }
    }

    /// Create a mock whose every call fails
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
        }
    }
}

impl TextSource for MockTextSource {
    type Error = OcrError;

    fn extract(&self, _bytes: &[u8], _kind: MediaKind) -> Result<ExtractedText, Self::Error> {
        match &self.result {
            Ok(extracted) => Ok(extracted.clone()),
            Err(reason) => Err(OcrError::Engine(reason.clone())),
        }
    }
}
