//! Clinical status derivation
//!
//! Status is a pure function of a value and its reference range. It is
//! computed independently of whatever status string the extraction engine
//! proposed, so a single faulty stage can never control both a value and
//! its classification.

use crate::observation::RefRange;
use serde::{Deserialize, Serialize};

/// Clinical status of an observation relative to its reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Value below the reference range
    Low,
    /// Value within the reference range
    Normal,
    /// Value above the reference range
    High,
    /// No reference range was printed in the report
    Unknown,
}

impl TestStatus {
    /// Derive the status of `value` against `range`
    ///
    /// Closed-interval semantics: equality at either bound counts as
    /// `Normal`. Clinical convention varies here, so the tie-break is fixed
    /// and documented rather than configurable. Without a range the status
    /// is `Unknown`; nothing is inferred from any other source.
    pub fn resolve(value: f64, range: Option<&RefRange>) -> TestStatus {
        match range {
            Some(range) if value < range.low => TestStatus::Low,
            Some(range) if value > range.high => TestStatus::High,
            Some(_) => TestStatus::Normal,
            None => TestStatus::Unknown,
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Low => write!(f, "low"),
            TestStatus::Normal => write!(f, "normal"),
            TestStatus::High => write!(f, "high"),
            TestStatus::Unknown => write!(f, "unknown"),
        }
    }
}
