//! Input media kinds and recognized text

use serde::{Deserialize, Serialize};

/// Declared kind of an uploaded report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Already-typed report text
    Text,
    /// Scanned or photographed report page
    Image,
    /// PDF document, possibly multi-page
    Pdf,
}

impl MediaKind {
    /// Map an HTTP content type to a media kind
    pub fn from_content_type(content_type: &str) -> Option<MediaKind> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();

        if essence.eq_ignore_ascii_case("application/pdf") {
            Some(MediaKind::Pdf)
        } else if essence.len() >= 6 && essence[..6].eq_ignore_ascii_case("image/") {
            Some(MediaKind::Image)
        } else if essence.len() >= 5 && essence[..5].eq_ignore_ascii_case("text/") {
            Some(MediaKind::Text)
        } else {
            None
        }
    }

    /// Sniff the media kind from magic bytes
    ///
    /// Fallback for uploads with a missing or generic content type. Bytes
    /// that match no known signature but decode as UTF-8 are treated as
    /// typed text.
    pub fn detect(bytes: &[u8]) -> Option<MediaKind> {
        if bytes.len() >= 5 && &bytes[0..5] == b"%PDF-" {
            Some(MediaKind::Pdf)
        } else if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
            // JPEG
            Some(MediaKind::Image)
        } else if bytes.len() >= 8
            && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        {
            // PNG
            Some(MediaKind::Image)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(MediaKind::Image)
        } else if std::str::from_utf8(bytes).is_ok() {
            Some(MediaKind::Text)
        } else {
            None
        }
    }
}

/// Report text produced by the recognition engine
///
/// Immutable once produced: created by a `TextSource`, consumed by the
/// extractor, never mutated in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// The recognized report text
    pub text: String,

    /// Recognition confidence in [0, 1]; 1.0 for typed text
    pub confidence: f64,
}

impl ExtractedText {
    /// Create recognized text with a confidence clamped to [0, 1]
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
