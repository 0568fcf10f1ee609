//! Prompt construction for question generation and tutoring.

use serde::{Deserialize, Serialize};

/// How many questions of each difficulty to ask the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMix {
    #[serde(default = "default_easy")]
    pub easy: u32,
    #[serde(default = "default_medium")]
    pub medium: u32,
    #[serde(default = "default_hard")]
    pub hard: u32,
}

fn default_easy() -> u32 {
    2
}
fn default_medium() -> u32 {
    2
}
fn default_hard() -> u32 {
    1
}

impl Default for QuestionMix {
    fn default() -> Self {
        Self {
            easy: default_easy(),
            medium: default_medium(),
            hard: default_hard(),
        }
    }
}

impl QuestionMix {
    pub fn total(&self) -> u32 {
        self.easy
            .saturating_add(self.medium)
            .saturating_add(self.hard)
    }
}

/// Build the question-generation prompt for a chapter.
pub fn question_prompt(chapter: &str, mix: &QuestionMix) -> String {
    format!(
        r#"Generate {total} multiple choice math questions for {chapter}, specifically:
- {easy} Easy questions
- {medium} Medium questions
- {hard} Hard questions

Format each question as a JSON object with these properties:
- question (string, keep it concise)
- options (array of 4 objects with id: "a"|"b"|"c"|"d" and text: string)
- correctAnswer ("a"|"b"|"c"|"d")
- explanation (brief but clear step-by-step solution)
- difficulty (string: "Easy"|"Medium"|"Hard")
- subject (string: the general math subject like "Algebra", "Geometry", etc.)
- chapter (string: the specific chapter, "{chapter}")

Make sure the questions are focused and practical. Return a clean JSON array without any additional text, explanation, or code formatting."#,
        total = mix.total(),
        easy = mix.easy,
        medium = mix.medium,
        hard = mix.hard,
    )
}

/// Build the tutor prompt for a student's question.
pub fn tutor_prompt(question: &str) -> String {
    format!(
        "You are a helpful math tutor. Answer this math question or provide guidance on this \
         math topic. Give a detailed, step-by-step explanation: {question}"
    )
}
