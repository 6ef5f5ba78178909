//! Parse engine output into candidate observations

use crate::error::ExtractorError;
use plainlab_domain::{Observation, RefRange};
use plainlab_llm::response;
use serde_json::Value;
use tracing::warn;

/// Parse the engine's response into candidate observations, in order
///
/// The response is first parsed as-is. If that fails, exactly one repair
/// pass runs: code fences and surrounding prose are stripped by slicing the
/// outermost JSON array, then parsing is retried once. Items missing a name
/// or numeric value are dropped with a warning; dropping every item is an
/// error, as is an empty or non-array payload.
pub(crate) fn parse_response(response: &str) -> Result<Vec<Observation>, ExtractorError> {
    let json = parse_with_repair(response)?;

    let items = json
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat("expected a JSON array".to_string()))?;

    if items.is_empty() {
        return Err(ExtractorError::NoObservations);
    }

    let mut observations = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_observation(item) {
            Ok(observation) => observations.push(observation),
            Err(reason) => {
                warn!(item = idx, reason, "dropping unusable observation");
            }
        }
    }

    if observations.is_empty() {
        return Err(ExtractorError::NoObservations);
    }

    Ok(observations)
}

/// Strict parse, then at most one repair pass
fn parse_with_repair(raw: &str) -> Result<Value, ExtractorError> {
    if let Ok(json) = serde_json::from_str::<Value>(raw.trim()) {
        return Ok(json);
    }

    let stripped = response::strip_code_fence(raw);
    let repaired = response::slice_json_array(stripped).ok_or_else(|| {
        ExtractorError::InvalidFormat("no JSON array found in engine output".to_string())
    })?;

    serde_json::from_str::<Value>(repaired)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))
}

/// Parse a single observation object
///
/// `name` and a numeric `value` are required. Engines occasionally quote
/// numbers, so numeric strings are accepted for `value`. A reference range
/// is kept only when both bounds are numeric; a missing range propagates as
/// `None` (status `unknown` downstream), never a fabricated one.
fn parse_observation(item: &Value) -> Result<Observation, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "item is not a JSON object".to_string())?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing or empty 'name'".to_string())?
        .to_string();

    let value = obj
        .get("value")
        .and_then(as_number)
        .ok_or_else(|| "missing or non-numeric 'value'".to_string())?;

    let unit = obj
        .get("unit")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let ref_range = obj.get("ref_range").and_then(parse_ref_range);

    let raw_status_hint = obj
        .get("status")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    Ok(Observation {
        name,
        value,
        unit,
        ref_range,
        raw_status_hint,
    })
}

fn parse_ref_range(value: &Value) -> Option<RefRange> {
    let obj = value.as_object()?;
    let low = obj.get("low").and_then(as_number)?;
    let high = obj.get("high").and_then(as_number)?;
    Some(RefRange::new(low, high))
}

/// Accept a JSON number, or a string that parses as one
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_array() {
        let response = r#"[
            {"name": "Hemoglobin", "value": 10.2, "unit": "g/dL",
             "ref_range": {"low": 12.0, "high": 17.0}, "status": "low"},
            {"name": "WBC", "value": 11200, "unit": "/uL",
             "ref_range": {"low": 4000, "high": 11000}, "status": "high"}
        ]"#;

        let observations = parse_response(response).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].name, "Hemoglobin");
        assert_eq!(observations[0].value, 10.2);
        assert_eq!(observations[0].ref_range, Some(RefRange::new(12.0, 17.0)));
        assert_eq!(observations[1].name, "WBC");
        assert_eq!(observations[1].value, 11200.0);
    }

    #[test]
    fn test_parse_preserves_order() {
        let response = r#"[
            {"name": "Hemoglobin", "value": 10.2},
            {"name": "WBC", "value": 11200},
            {"name": "Platelets", "value": 250000}
        ]"#;

        let observations = parse_response(response).unwrap();
        let names: Vec<&str> = observations.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Hemoglobin", "WBC", "Platelets"]);
    }

    #[test]
    fn test_repair_strips_markdown_fence() {
        let response = "```json\n[{\"name\": \"Glucose\", \"value\": 98}]\n```";
        let observations = parse_response(response).unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].name, "Glucose");
    }

    #[test]
    fn test_repair_strips_surrounding_prose() {
        let response =
            "Here are the extracted tests:\n[{\"name\": \"Glucose\", \"value\": 98}]\nLet me know!";
        let observations = parse_response(response).unwrap();
        assert_eq!(observations.len(), 1);
    }

    #[test]
    fn test_unrepairable_output_is_invalid_format() {
        let result = parse_response("I could not find any lab results in this report.");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_non_array_is_invalid_format() {
        let result = parse_response(r#"{"name": "Glucose", "value": 98}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_array_is_no_observations() {
        let result = parse_response("[]");
        assert!(matches!(result, Err(ExtractorError::NoObservations)));
    }

    #[test]
    fn test_items_missing_required_fields_are_dropped() {
        let response = r#"[
            {"name": "Hemoglobin", "value": 10.2},
            {"name": "WBC"},
            {"value": 98},
            {"name": "Platelets", "value": "250000"}
        ]"#;

        let observations = parse_response(response).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].name, "Hemoglobin");
        assert_eq!(observations[1].name, "Platelets");
        assert_eq!(observations[1].value, 250000.0);
    }

    #[test]
    fn test_all_items_dropped_is_no_observations() {
        let response = r#"[{"name": "WBC"}, {"value": 98}]"#;
        let result = parse_response(response);
        assert!(matches!(result, Err(ExtractorError::NoObservations)));
    }

    #[test]
    fn test_partial_ref_range_is_dropped_not_fabricated() {
        let response = r#"[{"name": "Ferritin", "value": 80, "ref_range": {"low": 30}}]"#;
        let observations = parse_response(response).unwrap();
        assert_eq!(observations[0].ref_range, None);
    }

    #[test]
    fn test_status_kept_as_untrusted_hint() {
        let response = r#"[{"name": "Hemoglobin", "value": 10.2, "status": "normal"}]"#;
        let observations = parse_response(response).unwrap();
        assert_eq!(observations[0].raw_status_hint.as_deref(), Some("normal"));
    }

    #[test]
    fn test_quoted_numeric_value_accepted() {
        let response = r#"[{"name": "WBC", "value": "11,200"}]"#;
        let observations = parse_response(response).unwrap();
        assert_eq!(observations[0].value, 11200.0);
    }
}
