//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the two
//! external engines. Infrastructure implementations live in other crates.

use crate::media::{ExtractedText, MediaKind};

/// Trait for the text-recognition engine
///
/// Implemented by the infrastructure layer (plainlab-ocr). A failure here
/// is terminal for the pipeline run that issued it.
pub trait TextSource {
    /// Error type for recognition operations
    type Error;

    /// Recognize text from raw report bytes of the given kind
    fn extract(&self, bytes: &[u8], kind: MediaKind) -> Result<ExtractedText, Self::Error>;
}

/// Trait for the text-generation engine
///
/// Implemented by the infrastructure layer (plainlab-llm). The engine
/// guarantees nothing about the structure of its output; all parsing and
/// repair is the caller's responsibility.
pub trait LlmProvider {
    /// Error type for generation operations
    type Error;

    /// Generate text completion for a prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
