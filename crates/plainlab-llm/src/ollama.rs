//! Ollama Provider Implementation
//!
//! Integration with Ollama's local generate API. The report simplifier runs
//! against a local model for privacy; nothing in a report leaves the host.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint, model, and sampling options
//! - JSON output mode (the extraction and summary prompts expect JSON)
//! - Retry logic with exponential backoff
//! - Bounded request timeout

use crate::LlmError;
use plainlab_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for generation requests (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default sampling temperature; extraction wants near-deterministic output
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Default generation length cap (tokens)
pub const DEFAULT_NUM_PREDICT: u32 = 2048;

/// Ollama API provider for local generation
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    timeout_secs: u64,
    temperature: f64,
    num_predict: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    /// Ask the engine for JSON output; parsing still never trusts it
    format: String,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: model to use (e.g., "llama3.2:latest")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client with static configuration");

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs,
            temperature: DEFAULT_TEMPERATURE,
            num_predict: DEFAULT_NUM_PREDICT,
        }
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns an error if Ollama is unreachable, the model is not pulled,
    /// the request times out, or the response body is malformed.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: "json".to_string(),
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        };

        // Retry transient failures with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        match response.json::<OllamaGenerateResponse>().await {
                            Ok(ollama_response) => {
                                if ollama_response.response.trim().is_empty() {
                                    return Err(LlmError::InvalidResponse(
                                        "empty response from engine".to_string(),
                                    ));
                                }
                                return Ok(ollama_response.response);
                            }
                            Err(e) => {
                                return Err(LlmError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                )));
                            }
                        }
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) if e.is_timeout() => {
                    return Err(LlmError::Timeout(self.timeout_secs));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async client; callers on an async
        // runtime must route through spawn_blocking.
        tokio::runtime::Runtime::new()
            .expect("runtime for blocking generation")
            .block_on(async { self.generate(prompt).await })
    }
}
