//! PlainLab Generation-Engine Layer
//!
//! Clients for the text-generation black box. The engine accepts a prompt
//! and returns text with no structural guarantee; everything downstream
//! treats the response as untyped and recovers structure explicitly (see
//! [`response`]).
//!
//! # Providers
//!
//! - `MockProvider`: deterministic mock for testing
//! - `OllamaProvider`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use plainlab_llm::MockProvider;
//! use plainlab_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("[]");
//! let result = provider.generate("any prompt").unwrap();
//! assert_eq!(result, "[]");
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod response;

use plainlab_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during generation-engine operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the engine
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Engine call exceeded its bounded timeout
    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    /// Model not available on the engine
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Generation error: {0}")]
    Other(String),
}

/// Mock generation engine for deterministic testing
///
/// Returns pre-configured responses without any network calls.
///
/// # Examples
///
/// ```
/// use plainlab_llm::MockProvider;
/// use plainlab_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("fallback");
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("anything else").unwrap(), "fallback");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
    fail_all: bool,
}

impl MockProvider {
    /// Create a mock that returns a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            fail_all: false,
        }
    }

    /// Create a mock whose every call fails with a communication error
    pub fn failing() -> Self {
        Self {
            default_response: String::new(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            fail_all: true,
        }
    }

    /// Add a specific response for an exact prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if self.fail_all {
            return Err(LlmError::Communication("mock engine offline".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}
