//! Guard configuration

/// Relative tolerance when matching fractional values against the source.
///
/// Integer values must match a printed number exactly; fractional values
/// tolerate recognition noise in the last digit within this bound.
pub const DECIMAL_RELATIVE_TOLERANCE: f64 = 0.1;

/// Configuration for the traceability checks
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Require every observation name to appear in the source text
    pub check_names: bool,

    /// Require every numeric value to appear in the source text
    pub check_values: bool,

    /// Relative tolerance for fractional value matching
    pub decimal_relative_tolerance: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            check_names: true,
            check_values: true,
            decimal_relative_tolerance: DECIMAL_RELATIVE_TOLERANCE,
        }
    }
}
