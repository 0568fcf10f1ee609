//! Tolerant extraction of question arrays from free-form model output.
//!
//! Model replies mix prose, markdown fences and JSON. [`extract`] runs an
//! ordered list of strategies over the text and stops at the first one whose
//! candidate parses to a sequence of objects:
//!
//! 1. fenced code blocks (`json`-tagged first, then untagged)
//! 2. first `[` through last `]`
//! 3. first `{` through last `}`, read through its `questions` field
//! 4. the whole text
//!
//! The located entries are then normalized as a unit: one bad entry rejects
//! the whole batch.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{ExtractionError, MalformedReason};
use crate::model::{Difficulty, Question, QuestionBatch, QuestionOption};

/// Subject used when an entry does not name one.
pub const DEFAULT_SUBJECT: &str = "Mathematics";

const REQUIRED_FIELDS: [&str; 4] = ["question", "options", "correctAnswer", "explanation"];

/// Heuristic used to locate a JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    FencedBlock,
    BracketScan,
    BraceScan,
    WholeText,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FencedBlock => "fenced_block",
            Strategy::BracketScan => "bracket_scan",
            Strategy::BraceScan => "brace_scan",
            Strategy::WholeText => "whole_text",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate JSON string and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub strategy: Strategy,
    pub text: String,
}

/// Extract a validated question batch from raw model output.
///
/// `default_chapter` fills the `chapter` of entries that do not carry one.
pub fn extract(raw_text: &str, default_chapter: &str) -> Result<QuestionBatch, ExtractionError> {
    let result = locate(raw_text).and_then(|entries| normalize(&entries, default_chapter));

    match &result {
        Ok(batch) => tracing::debug!(questions = batch.len(), "extracted question batch"),
        Err(e) => tracing::warn!(
            kind = ?e.kind(),
            text_len = raw_text.len(),
            "question extraction failed: {e}"
        ),
    }

    result
}

/// Run the strategies in order and return the first sequence of objects.
fn locate(raw_text: &str) -> Result<Vec<Map<String, Value>>, ExtractionError> {
    let mut fallback: Option<ExtractionError> = None;

    for candidate in candidates(raw_text) {
        let Some(value) = parse_tolerant(&candidate.text) else {
            tracing::trace!(strategy = %candidate.strategy, "candidate did not parse");
            continue;
        };

        match resolve_entries(value) {
            Ok(entries) => {
                tracing::debug!(
                    strategy = %candidate.strategy,
                    entries = entries.len(),
                    "located question array"
                );
                return Ok(entries);
            }
            Err(err) => {
                tracing::trace!(strategy = %candidate.strategy, "candidate rejected: {err}");
                // The first entry-level finding outranks a plain shape mismatch.
                fallback = match fallback {
                    Some(prev @ ExtractionError::Malformed { .. }) => Some(prev),
                    _ => Some(err),
                };
            }
        }
    }

    Err(fallback.unwrap_or(ExtractionError::NoCandidateFound))
}

/// Build the ordered candidate list for `raw_text`.
pub fn candidates(raw_text: &str) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = fenced_blocks(raw_text)
        .into_iter()
        .map(|text| Candidate {
            strategy: Strategy::FencedBlock,
            text,
        })
        .collect();

    if let Some(span) = delimited_span(raw_text, '[', ']') {
        out.push(Candidate {
            strategy: Strategy::BracketScan,
            text: span.to_string(),
        });
    }

    if let Some(span) = delimited_span(raw_text, '{', '}') {
        out.push(Candidate {
            strategy: Strategy::BraceScan,
            text: span.to_string(),
        });
    }

    let whole = raw_text.trim();
    if !whole.is_empty() {
        out.push(Candidate {
            strategy: Strategy::WholeText,
            text: whole.to_string(),
        });
    }

    out
}

/// First `open` through last `close`, inclusive.
fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Collect the bodies of fenced code blocks that may hold JSON.
///
/// Fences are found anywhere in the text, not only at line starts.
/// `json`-tagged blocks come before untagged ones; blocks tagged with any
/// other language are skipped. A block left open at the end of the text
/// (truncated output) still counts.
fn fenced_blocks(text: &str) -> Vec<String> {
    const FENCE: &str = "```";

    let mut json_blocks = Vec::new();
    let mut generic_blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after = rest[open..]
            .trim_start_matches('`')
            .trim_start_matches([' ', '\t']);
        let tag_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        let (tag, body) = after.split_at(tag_len);

        let (content, next) = match body.find(FENCE) {
            Some(close) => (&body[..close], body[close..].trim_start_matches('`')),
            None => (body, ""),
        };
        rest = next;

        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        if tag.eq_ignore_ascii_case("json") {
            json_blocks.push(content.to_string());
        } else if tag.is_empty() {
            generic_blocks.push(content.to_string());
        }
    }

    json_blocks.extend(generic_blocks);
    json_blocks
}

/// Parse `text` as JSON, retrying once with common model mistakes repaired.
pub fn parse_tolerant(text: &str) -> Option<Value> {
    let text = text.trim().trim_start_matches('\u{feff}').trim_start();
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let repaired = strip_trailing_commas(text);
    if repaired == text {
        return None;
    }
    serde_json::from_str(&repaired).ok()
}

/// Drop commas that directly precede `]` or `}` outside string literals.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Resolve a parsed value to its list of question objects.
fn resolve_entries(value: Value) -> Result<Vec<Map<String, Value>>, ExtractionError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => return Err(ExtractionError::NotAnArray),
        },
        _ => return Err(ExtractionError::NotAnArray),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(ExtractionError::Malformed {
                index,
                reason: MalformedReason::NotAnObject,
            }),
        })
        .collect()
}

/// Validate and normalize located entries into a batch.
///
/// Ids are always reassigned as `position + 1`. The first failing entry
/// fails the whole call.
pub fn normalize(
    entries: &[Map<String, Value>],
    default_chapter: &str,
) -> Result<QuestionBatch, ExtractionError> {
    if entries.is_empty() {
        return Err(ExtractionError::EmptyBatch);
    }

    let questions = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            normalize_entry(index, entry, default_chapter)
                .map_err(|reason| ExtractionError::Malformed { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionBatch::from_vec(questions))
}

fn normalize_entry(
    index: usize,
    entry: &Map<String, Value>,
    default_chapter: &str,
) -> Result<Question, MalformedReason> {
    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !entry.contains_key(**f)) {
        return Err(MalformedReason::MissingField(*field));
    }

    let question = required_str(entry, "question")?;
    if question.trim().is_empty() {
        return Err(MalformedReason::EmptyQuestion);
    }
    let correct_answer = required_str(entry, "correctAnswer")?;
    let explanation = required_str(entry, "explanation")?;
    let options = normalize_options(&entry["options"])?;

    if !options.iter().any(|o| o.id == correct_answer) {
        return Err(MalformedReason::DanglingCorrectAnswer(
            correct_answer.to_string(),
        ));
    }

    let difficulty = entry
        .get("difficulty")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Difficulty>().ok())
        .unwrap_or_default();

    Ok(Question {
        id: index as u32 + 1,
        question: question.to_string(),
        options,
        correct_answer: correct_answer.to_string(),
        explanation: explanation.to_string(),
        difficulty,
        subject: optional_str(entry, "subject")
            .unwrap_or(DEFAULT_SUBJECT)
            .to_string(),
        chapter: optional_str(entry, "chapter")
            .unwrap_or(default_chapter)
            .to_string(),
    })
}

fn normalize_options(value: &Value) -> Result<Vec<QuestionOption>, MalformedReason> {
    let items = value.as_array().ok_or(MalformedReason::WrongType {
        field: "options",
        expected: "an array",
    })?;
    if items.len() < 2 {
        return Err(MalformedReason::TooFewOptions(items.len()));
    }

    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .map(|(pos, item)| {
            let obj = item
                .as_object()
                .ok_or(MalformedReason::OptionNotAnObject(pos))?;

            let id = match obj.get("id") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::String(_)) | Some(Value::Null) | None => {
                    return Err(MalformedReason::EmptyOptionId(pos))
                }
                Some(_) => {
                    return Err(MalformedReason::WrongType {
                        field: "options[].id",
                        expected: "a string",
                    })
                }
            };

            let text = match obj.get("text") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::String(_)) | Some(Value::Null) | None => {
                    return Err(MalformedReason::EmptyOptionText(id))
                }
                Some(_) => {
                    return Err(MalformedReason::WrongType {
                        field: "options[].text",
                        expected: "a string",
                    })
                }
            };

            if !seen.insert(id.clone()) {
                return Err(MalformedReason::DuplicateOptionId(id));
            }

            Ok(QuestionOption { id, text })
        })
        .collect()
}

fn required_str<'a>(
    entry: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, MalformedReason> {
    match entry.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(MalformedReason::WrongType {
            field,
            expected: "a string",
        }),
        None => Err(MalformedReason::MissingField(field)),
    }
}

/// A non-blank string field, or `None` when absent, null, blank or not a string.
fn optional_str<'a>(entry: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
