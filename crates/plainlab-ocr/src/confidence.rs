//! Confidence heuristic for vision-recognized text
//!
//! Vision models return no per-word confidence, so the score is estimated
//! from output characteristics. Typed text never passes through here; it is
//! always confidence 1.0.

/// Estimate recognition confidence from the recognized text
///
/// Signals, in order of weight:
///
/// - length: empty output scores 0.0; longer output scores higher, since a
///   failed read of a report page produces little or nothing
/// - digits: lab reports are mostly numbers, so output without any digit is
///   suspect for this domain
/// - structure: line breaks suggest the page layout survived recognition
///
/// Capped at 0.95; a heuristic never claims certainty.
pub fn estimate(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let base: f64 = match trimmed.len() {
        0..=39 => 0.25,
        40..=159 => 0.45,
        160..=399 => 0.65,
        _ => 0.8,
    };

    let has_digits = trimmed.chars().any(|c| c.is_ascii_digit());
    let has_lines = trimmed.lines().count() > 1;

    let bonus = if has_digits { 0.1 } else { 0.0 } + if has_lines { 0.05 } else { 0.0 };

    (base + bonus).min(0.95)
}
