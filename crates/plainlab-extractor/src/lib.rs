//! PlainLab Test Extractor
//!
//! Converts free-form report text into an ordered batch of candidate
//! lab-test observations by prompting the generation engine for a JSON
//! array and repairing/parsing whatever comes back.
//!
//! The engine's output is never trusted: structure recovery is an explicit
//! stage (see [`parser`]), and the resulting candidates still face the
//! hallucination guard before anything downstream sees them.

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::TestExtractor;
