//! Repair helpers for engine output
//!
//! Engines wrap JSON in markdown code fences or surround it with prose.
//! These helpers recover the structured payload without ever trusting that
//! a schema was honored; callers still parse and validate the result.

/// Strip a markdown code fence, if the response is wrapped in one
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (``` or ```json) and the closing fence
    let after_open = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };

    match after_open.rfind("```") {
        Some(idx) => after_open[..idx].trim(),
        None => after_open.trim(),
    }
}

/// Slice the outermost JSON array from surrounding prose
///
/// Returns the text from the first `[` through the last `]`, or `None`
/// when no bracket pair exists.
pub fn slice_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

/// Slice the outermost JSON object from surrounding prose
///
/// Returns the text from the first `{` through the last `}`, or `None`
/// when no brace pair exists.
pub fn slice_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_with_language() {
        let response = "```json\n[1, 2]\n```";
        assert_eq!(strip_code_fence(response), "[1, 2]");
    }

    #[test]
    fn test_strip_code_fence_without_language() {
        let response = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(response), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn test_slice_json_array_from_prose() {
        let response = "Here are the results:\n[{\"name\": \"WBC\"}]\nHope that helps!";
        assert_eq!(slice_json_array(response), Some("[{\"name\": \"WBC\"}]"));
    }

    #[test]
    fn test_slice_json_array_absent() {
        assert_eq!(slice_json_array("no json here"), None);
    }

    #[test]
    fn test_slice_json_object_from_prose() {
        let response = "Sure! {\"summary\": \"ok\"} Done.";
        assert_eq!(slice_json_object(response), Some("{\"summary\": \"ok\"}"));
    }

    #[test]
    fn test_slice_json_object_mismatched_order() {
        assert_eq!(slice_json_object("} nothing {"), None);
    }
}
