//! mathtutor-core — Question model, tolerant extraction, and generation pipeline.
//!
//! This crate defines the practice-question data model, the extractor that
//! turns free-form model output into a validated [`QuestionBatch`], and the
//! provider trait the question generator and tutor are built on.

pub mod error;
pub mod extract;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod traits;
pub mod tutor;

pub use error::{ErrorReport, ExtractionError, ExtractionErrorKind, MalformedReason};
pub use extract::extract;
pub use model::{Chapter, Difficulty, Question, QuestionBatch, QuestionOption};
