//! Engine prompt for observation extraction

/// Builds the extraction prompt for a report text
pub(crate) struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a prompt builder for the given report text
    pub fn new(text: String) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nReport text:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract every lab-test result from the medical report below.
Each test becomes one JSON object with these exact field names:

{
  "name": "test name as printed",
  "value": 10.2,
  "unit": "g/dL",
  "ref_range": {"low": 12.0, "high": 17.0},
  "status": "low"
}

Rules:
- List tests in the order they appear in the report
- "name" and a numeric "value" are required for every test
- Correct obvious OCR digit errors in values (O to 0, l to 1) and drop thousands separators
- "unit" only when printed in the report; otherwise null
- "ref_range" only when a range is printed in the report; otherwise null - NEVER invent a range
- "status" is "low", "normal", or "high" when the report marks it; otherwise null
- Extract ONLY tests that appear in the report text; skip headers and partial entries"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {"name": "...", "value": 0.0, "unit": "...", "ref_range": {"low": 0.0, "high": 0.0}, "status": "..."}
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_report_text() {
        let builder = PromptBuilder::new("Hemoglobin 10.2 g/dL".to_string());
        let prompt = builder.build();
        assert!(prompt.contains("Hemoglobin 10.2 g/dL"));
    }

    #[test]
    fn test_prompt_includes_field_names() {
        let prompt = PromptBuilder::new("text".to_string()).build();
        assert!(prompt.contains("\"name\""));
        assert!(prompt.contains("\"value\""));
        assert!(prompt.contains("\"ref_range\""));
    }

    #[test]
    fn test_prompt_demands_mention_order() {
        let prompt = PromptBuilder::new("text".to_string()).build();
        assert!(prompt.contains("order they appear"));
    }

    #[test]
    fn test_prompt_forbids_invented_ranges() {
        let prompt = PromptBuilder::new("text".to_string()).build();
        assert!(prompt.contains("NEVER invent a range"));
    }
}
