//! TOML question bank parser.
//!
//! Loads question banks from TOML files and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::QuestionBank;
use crate::model::{Question, QuestionSet};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    topics: Vec<TomlTopic>,
}

#[derive(Debug, Deserialize)]
struct TomlTopic {
    name: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    text: String,
    options: Vec<String>,
    answer: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank_file(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let entries = parsed
        .topics
        .into_iter()
        .map(|topic| {
            let questions = topic
                .questions
                .into_iter()
                .map(|q| Question {
                    text: q.text,
                    options: q.options,
                    correct_answer: q.answer,
                })
                .collect();
            let set = QuestionSet::new(questions)
                .with_context(|| format!("invalid questions for topic '{}'", topic.name))?;
            Ok((topic.name, set))
        })
        .collect::<Result<Vec<_>>>()?;

    QuestionBank::new(entries)
        .with_context(|| format!("invalid question bank: {}", source_path.display()))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The topic (if applicable).
    pub topic: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for issues that do not break a quiz but probably are
/// authoring mistakes.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Topics differing only by case never match each other on lookup
    let mut seen_lower = HashSet::new();
    for topic in bank.topics() {
        if !seen_lower.insert(topic.to_lowercase()) {
            warnings.push(ValidationWarning {
                topic: Some(topic.to_string()),
                message: format!("topic '{topic}' differs from another topic only by case"),
            });
        }
    }

    for (topic, set) in bank.entries() {
        if set.len() < 2 {
            warnings.push(ValidationWarning {
                topic: Some(topic.clone()),
                message: "topic has a single question".into(),
            });
        }

        for question in set {
            let distinct: HashSet<&String> = question.options.iter().collect();
            if distinct.len() != question.options.len() {
                warnings.push(ValidationWarning {
                    topic: Some(topic.clone()),
                    message: format!("duplicate options in question: {}", question.text),
                });
            }
        }

        let mut seen_text = HashSet::new();
        for question in set {
            if !seen_text.insert(question.text.as_str()) {
                warnings.push(ValidationWarning {
                    topic: Some(topic.clone()),
                    message: format!("question asked twice: {}", question.text),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[topics]]
name = "Rust"

[[topics.questions]]
text = "Which keyword declares an immutable binding?"
options = ["let", "mut", "const fn", "static mut"]
answer = "let"

[[topics.questions]]
text = "What does `?` do on a Result?"
options = ["Panics", "Propagates the error", "Ignores the error", "Logs the error"]
answer = "Propagates the error"

[[topics]]
name = "Python"

[[topics.questions]]
text = "Which keyword defines a function?"
options = ["func", "def", "fn", "lambda"]
answer = "def"

[[topics.questions]]
text = "What is the type of `[]`?"
options = ["tuple", "dict", "list", "set"]
answer = "list"
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_bank_str(VALID_TOML, &PathBuf::from("bank.toml")).unwrap();
        assert_eq!(bank.topics().collect::<Vec<_>>(), vec!["Rust", "Python"]);
        assert_eq!(bank.lookup("Python")[1].correct_answer, "list");
        assert_eq!(bank.default_topic(), "Rust");
        assert!(validate_bank(&bank).is_empty());
    }

    #[test]
    fn answer_outside_options_is_an_error() {
        let toml = r#"
[[topics]]
name = "Broken"

[[topics.questions]]
text = "Pick one"
options = ["a", "b", "c", "d"]
answer = "e"
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bank.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("Broken"));
    }

    #[test]
    fn topic_without_questions_is_an_error() {
        let toml = r#"
[[topics]]
name = "Empty"
"#;
        assert!(parse_bank_str(toml, &PathBuf::from("bank.toml")).is_err());
    }

    #[test]
    fn file_without_topics_is_an_error() {
        assert!(parse_bank_str("", &PathBuf::from("bank.toml")).is_err());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_warnings() {
        let toml = r#"
[[topics]]
name = "Rust"

[[topics.questions]]
text = "Same option twice"
options = ["a", "a", "b", "c"]
answer = "a"

[[topics]]
name = "rust"

[[topics.questions]]
text = "Lowercase topic"
options = ["a", "b", "c", "d"]
answer = "d"

[[topics.questions]]
text = "Lowercase topic"
options = ["a", "b", "c", "d"]
answer = "d"
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("bank.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("only by case")));
        assert!(warnings.iter().any(|w| w.message.contains("single question")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate options")));
        assert!(warnings.iter().any(|w| w.message.contains("asked twice")));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("bank.toml");
        std::fs::write(&file_path, VALID_TOML).unwrap();

        let bank = parse_bank_file(&file_path).unwrap();
        assert!(bank.contains("Rust"));
    }
}
