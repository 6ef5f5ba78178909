//! Vision-model text recognition via the Ollama API
//!
//! Images go to a local vision model as base64 payloads on the standard
//! generate endpoint. Typed text never touches the engine; PDFs are split
//! into page images first (see [`crate::pdf`]).

use crate::{confidence, pdf, OcrError};
use base64::Engine as _;
use plainlab_domain::traits::TextSource;
use plainlab_domain::{ExtractedText, MediaKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default local Ollama endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for one page recognition (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Recognition instruction sent with every page image
const RECOGNITION_PROMPT: &str = "\
Read this medical report image and write out ALL visible text exactly as printed. \
Keep every test name, numeric value, unit, and reference range. Preserve the line \
structure of the page. Output the text only, with no commentary.";

/// Text source backed by a local vision model
///
/// Stateless with respect to a single request; safe to share behind an
/// `Arc` across concurrent pipeline runs. The trait method blocks, so async
/// callers drive it through `spawn_blocking`.
pub struct OllamaVisionSource {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct VisionGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

#[derive(Deserialize)]
struct VisionGenerateResponse {
    response: String,
}

impl OllamaVisionSource {
    /// Create a vision source
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint
    /// - `model`: vision-capable model (e.g., "llama3.2-vision:latest")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a vision source with an explicit per-page timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client with static configuration");

        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            timeout_secs,
        }
    }

    /// Create a vision source against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Recognize one image, returning text plus heuristic confidence
    fn recognize_image(&self, image_bytes: &[u8]) -> Result<ExtractedText, OcrError> {
        let url = format!("{}/api/generate", self.endpoint);
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);

        let body = VisionGenerateRequest {
            model: &self.model,
            prompt: RECOGNITION_PROMPT,
            images: vec![encoded],
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_timeout() {
                OcrError::Timeout(self.timeout_secs)
            } else {
                OcrError::Engine(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OcrError::Engine(format!("HTTP {}: {}", status, body)));
        }

        let parsed: VisionGenerateResponse = response
            .json()
            .map_err(|e| OcrError::Engine(format!("malformed response: {}", e)))?;

        let text = parsed.response.trim().to_string();
        let confidence = confidence::estimate(&text);

        debug!(
            model = %self.model,
            text_len = text.len(),
            confidence,
            "page recognized"
        );

        Ok(ExtractedText::new(text, confidence))
    }

    /// Recognize a PDF page by page, averaging page confidences
    fn recognize_pdf(&self, pdf_bytes: &[u8]) -> Result<ExtractedText, OcrError> {
        let pages = pdf::page_images(pdf_bytes)?;
        let page_count = pages.len();

        let mut texts = Vec::with_capacity(page_count);
        let mut confidence_sum = 0.0;

        for (idx, page) in pages.iter().enumerate() {
            info!(page = idx, total = page_count, "recognizing PDF page");
            let extracted = self.recognize_image(page)?;
            confidence_sum += extracted.confidence;
            texts.push(extracted.text);
        }

        let combined = texts.join("\n");
        let confidence = confidence_sum / page_count as f64;

        Ok(ExtractedText::new(combined, confidence))
    }
}

impl TextSource for OllamaVisionSource {
    type Error = OcrError;

    fn extract(&self, bytes: &[u8], kind: MediaKind) -> Result<ExtractedText, Self::Error> {
        match kind {
            MediaKind::Text => {
                let text = std::str::from_utf8(bytes).map_err(|_| OcrError::InvalidEncoding)?;
                Ok(ExtractedText::new(text.trim(), 1.0))
            }
            MediaKind::Image => self.recognize_image(bytes),
            MediaKind::Pdf => self.recognize_pdf(bytes),
        }
    }
}
