//! Engine prompt for patient-friendly summaries

use plainlab_domain::VerifiedObservation;

/// Builds the summary prompt over verified observations only
pub(crate) struct PromptBuilder<'a> {
    observations: &'a [VerifiedObservation],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(observations: &'a [VerifiedObservation]) -> Self {
        Self { observations }
    }

    /// Build the complete summary prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(SUMMARY_INSTRUCTIONS);
        prompt.push_str("\n\nVerified test results:\n");

        for observation in self.observations {
            prompt.push_str(&format!(
                "- {}: {}{} ({})\n",
                observation.name,
                observation.value,
                observation
                    .unit
                    .as_deref()
                    .map(|u| format!(" {}", u))
                    .unwrap_or_default(),
                observation.status,
            ));
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const SUMMARY_INSTRUCTIONS: &str = r#"You explain medical test results to patients in plain, everyday language.

Guidelines:
- Simple words, short sentences, empathetic and non-alarming tone
- Explain what each result means; never diagnose, never recommend treatment
- Explain ONLY the tests listed below; do not mention any other test
- For results marked low or high, give gentle context and suggest discussing with a doctor
- Write one explanation for every listed test, in the same order"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "summary": "One or two sentences covering the overall picture",
  "explanations": [
    {"text": "Plain-language explanation", "test_name": "exact test name from the list"}
  ]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations outside the JSON."#;
