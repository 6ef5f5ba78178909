//! Parse engine output into a summary payload

use crate::summarizer::Explanation;
use plainlab_llm::response;
use serde::Deserialize;

/// Shape the engine is asked for; parsing still never assumes it was honored
#[derive(Debug, Deserialize)]
pub(crate) struct SummaryPayload {
    pub summary: String,

    #[serde(default)]
    pub explanations: Vec<Explanation>,
}

/// Parse the engine's response, with the standard one-shot repair
///
/// Returns `None` when no usable JSON object can be recovered; the caller
/// degrades to templates rather than failing the request.
pub(crate) fn parse_response(raw: &str) -> Option<SummaryPayload> {
    if let Ok(payload) = serde_json::from_str::<SummaryPayload>(raw.trim()) {
        return Some(payload);
    }

    let stripped = response::strip_code_fence(raw);
    let repaired = response::slice_json_object(stripped)?;

    serde_json::from_str::<SummaryPayload>(repaired).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_payload() {
        let raw = r#"{"summary": "All good.", "explanations": [{"text": "Fine.", "test_name": "Glucose"}]}"#;
        let payload = parse_response(raw).unwrap();
        assert_eq!(payload.summary, "All good.");
        assert_eq!(payload.explanations.len(), 1);
    }

    #[test]
    fn test_parse_with_fence_and_prose() {
        let raw = "Sure, here you go:\n```json\n{\"summary\": \"ok\", \"explanations\": []}\n```";
        let payload = parse_response(raw).unwrap();
        assert_eq!(payload.summary, "ok");
    }

    #[test]
    fn test_missing_explanations_defaults_empty() {
        let payload = parse_response(r#"{"summary": "ok"}"#).unwrap();
        assert!(payload.explanations.is_empty());
    }

    #[test]
    fn test_unrecoverable_output_is_none() {
        assert!(parse_response("I cannot produce JSON today.").is_none());
    }

    #[test]
    fn test_missing_summary_is_none() {
        assert!(parse_response(r#"{"explanations": []}"#).is_none());
    }
}
