//! Lab-test observations and batches

use crate::status::TestStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clinically normal interval for a test, as printed in the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefRange {
    /// Lower bound of the normal range
    pub low: f64,

    /// Upper bound of the normal range
    pub high: f64,
}

impl RefRange {
    /// Create a new reference range
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// One candidate lab-test data point extracted from a report
///
/// Candidates carry whatever the extraction engine proposed, including an
/// untrusted `raw_status_hint`. They only become [`VerifiedObservation`]s
/// after the hallucination guard accepts the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Test name as printed in the report
    pub name: String,

    /// Numeric test value
    pub value: f64,

    /// Unit of measurement, when printed
    pub unit: Option<String>,

    /// Reference range, when printed; never fabricated
    pub ref_range: Option<RefRange>,

    /// Status string proposed by the extraction engine. Untrusted: it
    /// originates from the same pass the guard checks, so status derivation
    /// never reads it.
    pub raw_status_hint: Option<String>,
}

impl Observation {
    /// Derive the clinical status and seal the observation
    ///
    /// The status is a pure function of `value` vs `ref_range`; the
    /// extraction engine's `raw_status_hint` is dropped at this boundary.
    pub fn resolve(self) -> VerifiedObservation {
        let status = TestStatus::resolve(self.value, self.ref_range.as_ref());
        VerifiedObservation {
            name: self.name,
            value: self.value,
            unit: self.unit,
            status,
            ref_range: self.ref_range,
        }
    }
}

/// An observation whose batch passed the hallucination guard, with its
/// status derived from `value` vs `ref_range`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedObservation {
    /// Test name as printed in the report
    pub name: String,

    /// Numeric test value
    pub value: f64,

    /// Unit of measurement, when printed
    pub unit: Option<String>,

    /// Derived clinical status
    pub status: TestStatus,

    /// Reference range used for the derivation
    pub ref_range: Option<RefRange>,
}

/// Error constructing an [`ObservationBatch`] from no observations
#[derive(Debug, Error, PartialEq, Eq)]
#[error("observation batch must contain at least one observation")]
pub struct EmptyBatch;

/// Ordered, non-empty sequence of observations
///
/// Insertion order is the order of first mention in the source text and is
/// preserved through validation, status derivation, and summarization into
/// the final `tests` and `explanations` arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBatch {
    observations: Vec<Observation>,
}

impl ObservationBatch {
    /// Create a batch, rejecting an empty sequence
    pub fn new(observations: Vec<Observation>) -> Result<Self, EmptyBatch> {
        if observations.is_empty() {
            return Err(EmptyBatch);
        }
        Ok(Self { observations })
    }

    /// Number of observations in the batch (always at least 1)
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// A batch is never empty; provided for clippy's `len` convention
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Observations in insertion order
    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    /// Consume the batch, yielding observations in insertion order
    pub fn into_inner(self) -> Vec<Observation> {
        self.observations
    }

    /// Derive statuses for every observation, in order
    pub fn resolve_all(self) -> Vec<VerifiedObservation> {
        self.observations.into_iter().map(Observation::resolve).collect()
    }
}

impl<'a> IntoIterator for &'a ObservationBatch {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
