//! Extraction error types.
//!
//! Every input handed to the extractor resolves either to a valid batch or
//! to one of these variants. Callers map them to their own transport (an
//! HTTP status, a CLI exit code) through [`ExtractionError::report`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when extracting questions from model output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// No strategy produced parseable JSON.
    #[error("no JSON candidate found in model output")]
    NoCandidateFound,

    /// JSON was found, but it is not a question array (nor an object wrapping one).
    #[error("extracted JSON is not a question array")]
    NotAnArray,

    /// A specific entry failed validation.
    #[error("question at index {index} is malformed: {reason}")]
    Malformed {
        index: usize,
        reason: MalformedReason,
    },

    /// The array parsed but held no questions.
    #[error("model returned an empty question list")]
    EmptyBatch,
}

/// Why a single entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("entry is not an object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("question text is empty")]
    EmptyQuestion,

    #[error("expected at least 2 options, found {0}")]
    TooFewOptions(usize),

    #[error("option {0} is not an object")]
    OptionNotAnObject(usize),

    #[error("option {0} has a missing or empty id")]
    EmptyOptionId(usize),

    #[error("option `{0}` has empty text")]
    EmptyOptionText(String),

    #[error("duplicate option id `{0}`")]
    DuplicateOptionId(String),

    #[error("correctAnswer `{0}` does not match any option id")]
    DanglingCorrectAnswer(String),
}

/// Machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionErrorKind {
    NoCandidateFound,
    NotAnArray,
    Malformed,
    EmptyBatch,
}

/// Serializable form of an [`ExtractionError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ExtractionErrorKind,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offending_index: Option<usize>,
}

impl ExtractionError {
    pub fn kind(&self) -> ExtractionErrorKind {
        match self {
            ExtractionError::NoCandidateFound => ExtractionErrorKind::NoCandidateFound,
            ExtractionError::NotAnArray => ExtractionErrorKind::NotAnArray,
            ExtractionError::Malformed { .. } => ExtractionErrorKind::Malformed,
            ExtractionError::EmptyBatch => ExtractionErrorKind::EmptyBatch,
        }
    }

    /// Zero-based index of the rejected entry, for `Malformed`.
    pub fn offending_index(&self) -> Option<usize> {
        match self {
            ExtractionError::Malformed { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            detail: self.to_string(),
            offending_index: self.offending_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_report_carries_index() {
        let err = ExtractionError::Malformed {
            index: 2,
            reason: MalformedReason::DanglingCorrectAnswer("e".into()),
        };
        let report = err.report();
        assert_eq!(report.kind, ExtractionErrorKind::Malformed);
        assert_eq!(report.offending_index, Some(2));
        assert!(report.detail.contains("index 2"));
        assert!(report.detail.contains("`e`"));
    }

    #[test]
    fn report_json_shape() {
        let json = serde_json::to_value(ExtractionError::EmptyBatch.report()).unwrap();
        assert_eq!(json["kind"], "empty_batch");
        assert!(json.get("offending_index").is_none());
    }
}
