//! PlainLab Pipeline Orchestrator
//!
//! Sequences the four stages — text recognition, observation extraction,
//! hallucination validation, status resolution — and the recoverable
//! summarization step into one linear, fail-closed run:
//!
//! ```text
//! Received -> TextExtracted -> TestsExtracted -> Validated
//!          -> StatusResolved -> Summarized -> Done
//! ```
//!
//! Any stage error moves directly to a failed terminal state; no stage is
//! retried (callers retry by re-invoking the whole pipeline). Every run
//! yields exactly one [`PipelineResult`] — `ok` with verified tests, or
//! `unprocessed` with a reason — or nothing, when the caller goes away and
//! drops the future.

#![warn(missing_docs)]

mod error;
mod orchestrator;
mod result;

pub use error::{Stage, StageFailure};
pub use orchestrator::{Pipeline, PipelineConfig, RawInput};
pub use result::PipelineResult;
