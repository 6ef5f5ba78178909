//! HTTP request handlers
//!
//! One primary endpoint accepts a report upload (text, image, or PDF) and
//! returns the pipeline result as JSON; a text-only endpoint skips
//! recognition; a health endpoint reports liveness. Every pipeline outcome
//! — including guardrail rejection — is a 200 with a `status` field; only
//! transport-level faults are 4xx.

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use plainlab_domain::traits::{LlmProvider, TextSource};
use plainlab_domain::MediaKind;
use plainlab_pipeline::{Pipeline, PipelineResult, RawInput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Upload size cap; scanned multi-page PDFs stay well under this
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state
pub struct AppState<T, L>
where
    T: TextSource,
    L: LlmProvider,
{
    /// The one pipeline serving every request
    pub pipeline: Arc<Pipeline<T, L>>,
}

impl<T: TextSource, L: LlmProvider> Clone for AppState<T, L> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// Text-only processing request
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// Raw medical report text
    pub text: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Liveness status
    pub status: String,
}

/// Error response for transport-level faults
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Transport-level error; pipeline outcomes never pass through here
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (missing file part, unrecognizable media, ...)
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

/// POST /process/report - run the full pipeline on an uploaded file
async fn process_report<T, L>(
    State(state): State<AppState<T, L>>,
    mut multipart: Multipart,
) -> Result<Json<PipelineResult>, ApiError>
where
    T: TextSource + Send + Sync + 'static,
    L: LlmProvider + Send + Sync + 'static,
    T::Error: std::fmt::Display + Send + 'static,
    L::Error: std::fmt::Display,
{
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(String::from);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;
            upload = Some((content_type, bytes.to_vec()));
            break;
        }
    }

    let (content_type, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("missing 'file' field".to_string()))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }

    let kind = content_type
        .as_deref()
        .and_then(MediaKind::from_content_type)
        .or_else(|| MediaKind::detect(&bytes))
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "unsupported file type: {}",
                content_type.as_deref().unwrap_or("unknown")
            ))
        })?;

    info!(?kind, bytes = bytes.len(), "report upload received");

    let result = state.pipeline.run(RawInput { bytes, kind }).await;
    Ok(Json(result))
}

/// POST /process/text - run the pipeline on raw report text
async fn process_text<T, L>(
    State(state): State<AppState<T, L>>,
    Json(request): Json<TextRequest>,
) -> Json<PipelineResult>
where
    T: TextSource + Send + Sync + 'static,
    L: LlmProvider + Send + Sync + 'static,
    T::Error: std::fmt::Display + Send + 'static,
    L::Error: std::fmt::Display,
{
    info!(text_len = request.text.len(), "text report received");

    let result = state
        .pipeline
        .run(RawInput {
            bytes: request.text.into_bytes(),
            kind: MediaKind::Text,
        })
        .await;

    Json(result)
}

/// GET /health - liveness check
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<T, L>(state: AppState<T, L>) -> Router
where
    T: TextSource + Send + Sync + 'static,
    L: LlmProvider + Send + Sync + 'static,
    T::Error: std::fmt::Display + Send + 'static,
    L::Error: std::fmt::Display,
{
    Router::new()
        .route("/process/report", post(process_report::<T, L>))
        .route("/process/text", post(process_text::<T, L>))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
