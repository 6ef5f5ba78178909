//! PlainLab Server
//!
//! HTTP surface for the report-simplification pipeline: file upload,
//! text-only processing, and health check.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use plainlab_extractor::{ExtractorConfig, TestExtractor};
use plainlab_guard::HallucinationGuard;
use plainlab_llm::OllamaProvider;
use plainlab_ocr::OllamaVisionSource;
use plainlab_pipeline::{Pipeline, PipelineConfig};
use plainlab_summarizer::Summarizer;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Assemble the production pipeline from configuration
pub fn build_pipeline(config: &ServerConfig) -> Pipeline<OllamaVisionSource, OllamaProvider> {
    let provider = Arc::new(OllamaProvider::with_timeout(
        &config.engine.endpoint,
        &config.engine.model,
        config.engine.timeout_secs,
    ));

    let text_source = Arc::new(OllamaVisionSource::with_timeout(
        &config.engine.endpoint,
        &config.engine.vision_model,
        config.engine.timeout_secs,
    ));

    let extractor_config = ExtractorConfig {
        max_text_length: config.pipeline.max_text_length,
        extraction_timeout_secs: config.engine.timeout_secs,
    };

    Pipeline::new(
        text_source,
        TestExtractor::new(Arc::clone(&provider), extractor_config),
        HallucinationGuard::default_config(),
        Summarizer::new(provider).with_timeout_secs(config.engine.timeout_secs),
        PipelineConfig {
            min_text_confidence: config.pipeline.min_text_confidence,
        },
    )
}

/// Start the HTTP server
///
/// Initializes tracing, assembles the pipeline, and serves until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting PlainLab server");
    info!("Bind address: {}", config.bind_addr());
    info!("Engine endpoint: {}", config.engine.endpoint);
    info!("Text model: {}", config.engine.model);
    info!("Vision model: {}", config.engine.vision_model);

    let state = AppState {
        pipeline: Arc::new(build_pipeline(&config)),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
