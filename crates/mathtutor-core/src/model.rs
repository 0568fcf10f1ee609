//! Core data model types for mathtutor.
//!
//! These are the types a practice session consumes: multiple-choice
//! questions, their options, and the ordered batch returned for one request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One answer choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Option label (e.g. "a" or "A"), unique within its question.
    pub id: String,
    /// Answer text shown to the student.
    pub text: String,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A single validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Position in the batch, starting at 1.
    pub id: u32,
    /// The question text.
    pub question: String,
    /// Answer choices in presentation order.
    pub options: Vec<QuestionOption>,
    /// The `id` of the correct option.
    pub correct_answer: String,
    /// Worked solution. May be empty.
    pub explanation: String,
    /// Difficulty label.
    pub difficulty: Difficulty,
    /// General subject (e.g. "Algebra").
    pub subject: String,
    /// Chapter the question belongs to.
    pub chapter: String,
}

impl Question {
    /// The option whose id equals `correct_answer`.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == self.correct_answer)
    }

    /// Whether `option_id` is the correct answer. Case-sensitive.
    pub fn is_correct(&self, option_id: &str) -> bool {
        self.correct_answer == option_id
    }
}

/// Difficulty labels, matched case-sensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The ordered questions returned for one practice request.
///
/// Insertion order is presentation order and ids run `1..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBatch(Vec<Question>);

impl QuestionBatch {
    pub(crate) fn from_vec(questions: Vec<Question>) -> Self {
        Self(questions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.0
    }

    /// Look up a question by its batch id.
    pub fn get(&self, id: u32) -> Option<&Question> {
        self.0.iter().find(|q| q.id == id)
    }

    pub fn into_inner(self) -> Vec<Question> {
        self.0
    }
}

impl IntoIterator for QuestionBatch {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuestionBatch {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A chapter a student can request questions for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Stable identifier (e.g. "quadratic-equations").
    pub id: String,
    /// Display name sent to the model (e.g. "Quadratic Equations").
    pub name: String,
    /// General subject (e.g. "Algebra").
    pub subject: String,
}
