//! Name and value matching against the source text

use regex::Regex;
use std::sync::OnceLock;

/// Groups of interchangeable test names; a report printing any member
/// traces an observation named after any other member. Taken from the
/// abbreviations that actually show up on lab printouts.
const ALIAS_GROUPS: &[&[&str]] = &[
    &["hemoglobin", "hgb", "hb"],
    &["white blood cells", "white blood cell count", "wbc", "leukocytes"],
    &["red blood cells", "red blood cell count", "rbc", "erythrocytes"],
    &["platelets", "platelet count", "plt"],
    &["hematocrit", "hct"],
    &["glucose", "gluc"],
    &["total cholesterol", "cholesterol", "chol"],
    &["creatinine", "creat"],
    &["blood urea nitrogen", "bun"],
    &["alanine aminotransferase", "alt", "sgpt"],
    &["aspartate aminotransferase", "ast", "sgot"],
    &["thyroid stimulating hormone", "tsh"],
];

/// Lowercase and collapse all whitespace runs to single spaces
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check whether a test name is traceable to the normalized source text
///
/// The name itself is tried first as a substring; failing that, every
/// alias in the name's group is tried. Matching is case-insensitive and
/// whitespace-normalized on both sides.
pub(crate) fn name_present(name: &str, normalized_source: &str) -> bool {
    let needle = normalize(name);
    if needle.is_empty() {
        return false;
    }
    if normalized_source.contains(&needle) {
        return true;
    }

    for group in ALIAS_GROUPS {
        if group.contains(&needle.as_str()) {
            return group
                .iter()
                .any(|alias| normalized_source.contains(alias));
        }
    }

    false
}

/// Collect every number printed in the source text
///
/// Thousands separators are stripped, so "11,200" yields 11200. Trailing
/// dots outside a fraction ("Glucose was 98.") parse as integers.
pub(crate) fn numbers_in(text: &str) -> Vec<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| {
        Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("static number pattern")
    });

    re.find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect()
}

/// Check whether a value is traceable to the numbers printed in the source
///
/// Integer values must match exactly; fractional values match within the
/// given relative tolerance, absorbing last-digit recognition noise.
pub(crate) fn value_present(value: f64, source_numbers: &[f64], relative_tolerance: f64) -> bool {
    if value.fract() == 0.0 {
        source_numbers.iter().any(|&n| n == value)
    } else {
        let tolerance = relative_tolerance * value.abs();
        source_numbers.iter().any(|&n| (n - value).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  White \t Blood\nCells "), "white blood cells");
    }

    #[test]
    fn test_name_present_direct_substring() {
        let source = normalize("CBC: Hemoglobin 10.2 g/dL (Low)");
        assert!(name_present("Hemoglobin", &source));
        assert!(name_present("hemoglobin", &source));
    }

    #[test]
    fn test_name_present_via_abbreviation() {
        // Report prints the abbreviation, extractor expanded the name
        let source = normalize("Hgb: 10.2 g/dL");
        assert!(name_present("Hemoglobin", &source));

        // Report prints the full name, extractor kept the abbreviation
        let source = normalize("White blood cells: 11,200 /uL");
        assert!(name_present("WBC", &source));
    }

    #[test]
    fn test_name_absent() {
        let source = normalize("Hemoglobin 10.2 g/dL");
        assert!(!name_present("Troponin I", &source));
    }

    #[test]
    fn test_numbers_in_strips_thousands_separators() {
        let numbers = numbers_in("WBC 11,200 /uL (4,000-11,000)");
        assert!(numbers.contains(&11200.0));
        assert!(numbers.contains(&4000.0));
        assert!(numbers.contains(&11000.0));
    }

    #[test]
    fn test_numbers_in_finds_decimals() {
        let numbers = numbers_in("Hemoglobin 10.2 g/dL (12.0-17.0)");
        assert_eq!(numbers, vec![10.2, 12.0, 17.0]);
    }

    #[test]
    fn test_integer_value_requires_exact_match() {
        let numbers = vec![11200.0, 98.0];
        assert!(value_present(11200.0, &numbers, 0.1));
        assert!(!value_present(11201.0, &numbers, 0.1));
    }

    #[test]
    fn test_decimal_value_tolerates_last_digit_noise() {
        let numbers = vec![10.2];
        assert!(value_present(10.2, &numbers, 0.1));
        assert!(value_present(10.3, &numbers, 0.1));
        assert!(!value_present(99.9, &numbers, 0.1));
    }
}
