//! PlainLab Hallucination Guard
//!
//! Deterministic, whole-batch traceability check between extracted
//! observations and the report text they supposedly came from. Every
//! observation's name and numeric value must be findable in the source;
//! one untraceable observation rejects the entire batch.
//!
//! The batch-level rejection is deliberate: a single fabricated value
//! invalidates trust in the whole extraction pass, and partial acceptance
//! would leak unverified data into summaries.

#![warn(missing_docs)]

mod config;
mod guard;
mod matcher;

pub use config::GuardConfig;
pub use guard::{HallucinationGuard, ValidationVerdict, HALLUCINATION_REASON};
