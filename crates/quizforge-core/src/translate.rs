//! Translation of raw model output into a `QuestionSet`.
//!
//! Model output is free-form, so parsing is best-effort, but the result is
//! all-or-nothing: either every question decodes into a valid `Question`, or
//! the whole response is rejected.
//!
//! Two shapes are understood:
//! - a JSON array of `{question, options, answer}` objects, optionally wrapped
//!   in a markdown code fence or in an object with a `questions` field
//! - lettered text: `Q1. Question? A) .. B) .. C) .. D) .. Answer: A`

use serde_json::Value;
use thiserror::Error;

use crate::error::QuizError;
use crate::model::{Question, QuestionSet};

/// Why a model response could not be turned into questions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,

    #[error("no question data found in response")]
    NoQuestionData,

    #[error("malformed question at index {index}: {reason}")]
    Malformed { index: usize, reason: String },

    #[error(transparent)]
    Invalid(#[from] QuizError),
}

/// Translate a raw model response into a `QuestionSet`.
pub fn translate_questions(content: &str) -> Result<QuestionSet, ParseError> {
    if content.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let body = extract_json_from_markdown(content);
    if let Some(value) = find_json(&body) {
        // Brackets inside lettered options (`A) []`) also look like JSON.
        return from_json(&value)
            .or_else(|json_err| from_lettered(content).map_err(|_| json_err));
    }

    from_lettered(content)
}

fn from_json(value: &Value) -> Result<QuestionSet, ParseError> {
    Ok(QuestionSet::new(questions_from_json(value)?)?)
}

fn from_lettered(content: &str) -> Result<QuestionSet, ParseError> {
    Ok(QuestionSet::new(parse_lettered(content)?)?)
}

/// Extract the payload of markdown code fences.
///
/// Prefers ```json blocks, then generic ``` blocks, and returns the raw
/// response when there are none.
pub fn extract_json_from_markdown(response: &str) -> String {
    let mut json_blocks = Vec::new();
    let mut generic_blocks = Vec::new();
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block {
                json_blocks.push(current_block.clone());
            } else if is_generic_block {
                generic_blocks.push(current_block.clone());
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // A truncated response may leave the last fence open
    if in_block && !current_block.is_empty() {
        if is_json_block {
            json_blocks.push(current_block);
        } else if is_generic_block {
            generic_blocks.push(current_block);
        }
    }

    if let Some(block) = json_blocks.into_iter().next() {
        return block;
    }
    if let Some(block) = generic_blocks.into_iter().next() {
        return block;
    }

    response.to_string()
}

/// Locate a JSON document in `body`: the whole text, else the outermost
/// `[...]`, else the outermost `{...}`.
fn find_json(body: &str) -> Option<Value> {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_array() || value.is_object() {
            return Some(value);
        }
    }

    [('[', ']'), ('{', '}')].into_iter().find_map(|(open, close)| {
        let start = trimmed.find(open)?;
        let end = trimmed.rfind(close)?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
    })
}

fn questions_from_json(value: &Value) -> Result<Vec<Question>, ParseError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items,
            _ => return Err(ParseError::NoQuestionData),
        },
        _ => return Err(ParseError::NoQuestionData),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| question_from_json(index, item))
        .collect()
}

fn question_from_json(index: usize, item: &Value) -> Result<Question, ParseError> {
    let malformed = |reason: &str| ParseError::Malformed {
        index,
        reason: reason.to_string(),
    };

    let text = string_field(item, &["question", "text"])
        .ok_or_else(|| malformed("missing question text"))?;
    let answer = string_field(item, &["answer", "correct_answer", "correctAnswer"])
        .ok_or_else(|| malformed("missing answer"))?;
    let options = item
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing options"))?
        .iter()
        .map(|o| o.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| malformed("options must be strings"))?;

    Ok(Question {
        text,
        options,
        correct_answer: answer,
    })
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
}

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Parse the lettered text format, one chunk per `Q<n>.` marker.
fn parse_lettered(content: &str) -> Result<Vec<Question>, ParseError> {
    let markers = question_markers(content);
    let chunks: Vec<&str> = if markers.is_empty() {
        vec![content]
    } else {
        markers
            .iter()
            .enumerate()
            .map(|(i, &(_, body_start))| {
                let end = markers.get(i + 1).map_or(content.len(), |&(start, _)| start);
                &content[body_start..end]
            })
            .collect()
    };

    let mut questions = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.into_iter().enumerate() {
        match parse_lettered_chunk(chunk) {
            Some(question) => questions.push(question),
            // A response with no recognisable structure at all is not a
            // malformed question, it is simply not a quiz.
            None if markers.is_empty() => return Err(ParseError::NoQuestionData),
            None => {
                return Err(ParseError::Malformed {
                    index,
                    reason: "expected options A) to D) and an Answer: line".into(),
                })
            }
        }
    }
    Ok(questions)
}

/// Positions of `Q<digits>.` (or `:` / `)`) markers as (marker start, body start).
fn question_markers(content: &str) -> Vec<(usize, usize)> {
    let bytes = content.as_bytes();
    let mut markers = Vec::new();

    for (i, _) in content.match_indices('Q') {
        let at_boundary = i == 0 || bytes[i - 1].is_ascii_whitespace();
        if !at_boundary {
            continue;
        }
        let digits = bytes[i + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let sep = i + 1 + digits;
        if digits > 0 && matches!(bytes.get(sep), Some(b'.' | b':' | b')')) {
            markers.push((i, sep + 1));
        }
    }
    markers
}

fn parse_lettered_chunk(chunk: &str) -> Option<Question> {
    let answer_pos = chunk.to_ascii_lowercase().find("answer:")?;
    let (body, answer_part) = (&chunk[..answer_pos], &chunk[answer_pos + "answer:".len()..]);

    let mut positions = Vec::with_capacity(OPTION_LETTERS.len());
    let mut from = 0;
    for letter in OPTION_LETTERS {
        let pos = find_option_marker(body, from, letter)?;
        positions.push(pos);
        from = pos + 2;
    }

    let text = body[..positions[0]].trim().to_string();
    let options = positions
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = positions.get(i + 1).copied().unwrap_or(body.len());
            let option = body[start + 2..end].trim().trim_end_matches(',');
            let option = if i == OPTION_LETTERS.len() - 1 {
                option.trim_end_matches('.')
            } else {
                option
            };
            option.trim().to_string()
        })
        .collect::<Vec<_>>();

    let letter = answer_part.trim_start().chars().next()?.to_ascii_uppercase();
    let index = OPTION_LETTERS.iter().position(|&l| l == letter)?;

    Some(Question {
        text,
        correct_answer: options[index].clone(),
        options,
    })
}

/// Find `<letter>)` at or after `from`, preceded by whitespace or the start.
fn find_option_marker(body: &str, from: usize, letter: char) -> Option<usize> {
    let needle = format!("{letter})");
    let bytes = body.as_bytes();
    body[from..]
        .match_indices(needle.as_str())
        .map(|(offset, _)| from + offset)
        .find(|&pos| pos == 0 || bytes[pos - 1].is_ascii_whitespace())
}
