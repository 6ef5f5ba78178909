//! Status-based fallback templates
//!
//! Used whenever the engine returns fewer explanations than observations,
//! or fails outright. Plain wording, no diagnosis, no treatment advice.

use plainlab_domain::{TestStatus, VerifiedObservation};

/// Templated explanation for one observation
pub(crate) fn explanation_for(observation: &VerifiedObservation) -> String {
    let unit = observation
        .unit
        .as_deref()
        .map(|u| format!(" {}", u))
        .unwrap_or_default();

    match observation.status {
        TestStatus::Low => format!(
            "Your {} is {}{}, which is below the typical range. \
             Your doctor can help you understand what this means for you.",
            observation.name, observation.value, unit
        ),
        TestStatus::High => format!(
            "Your {} is {}{}, which is above the typical range. \
             Your doctor can help you understand what this means for you.",
            observation.name, observation.value, unit
        ),
        TestStatus::Normal => format!(
            "Your {} is {}{}, which is within the typical range.",
            observation.name, observation.value, unit
        ),
        TestStatus::Unknown => format!(
            "Your {} is {}{}. The report did not include a reference range, \
             so ask your doctor how to read this result.",
            observation.name, observation.value, unit
        ),
    }
}

/// Templated overall summary across all observations
pub(crate) fn summary_for(observations: &[VerifiedObservation]) -> String {
    let abnormal: Vec<&str> = observations
        .iter()
        .filter(|o| matches!(o.status, TestStatus::Low | TestStatus::High))
        .map(|o| o.name.as_str())
        .collect();

    if abnormal.is_empty() {
        "Your test results are within their typical ranges.".to_string()
    } else {
        format!(
            "{} of your {} test results are outside the typical range: {}. \
             Consider discussing these with your doctor.",
            abnormal.len(),
            observations.len(),
            abnormal.join(", ")
        )
    }
}
