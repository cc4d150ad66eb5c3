//! The static question bank used when AI generation is unavailable.

use crate::error::QuizError;
use crate::model::{Question, QuestionSet};

/// Topics offered by the topic picker. Topics without a bank entry still
/// work: generation is attempted and the fallback is the default topic.
pub const PICKER_TOPICS: [&str; 6] = [
    "React",
    "JavaScript",
    "Python",
    "History",
    "Science",
    "Movies",
];

/// Read-only mapping from topic name to question set.
///
/// Registration order is preserved and the first registered topic is the
/// default returned for unknown topics.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    entries: Vec<(String, QuestionSet)>,
}

impl QuestionBank {
    pub fn new(entries: Vec<(String, QuestionSet)>) -> Result<Self, QuizError> {
        if entries.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let mut seen = std::collections::HashSet::new();
        for (topic, _) in &entries {
            if !seen.insert(topic.as_str()) {
                return Err(QuizError::DuplicateTopic(topic.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in bank: `React` (the default) and `JavaScript`.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ("React".to_string(), builtin_set(REACT)),
                ("JavaScript".to_string(), builtin_set(JAVASCRIPT)),
            ],
        }
    }

    /// Question set for `topic`, or the default topic's set when there is no
    /// exact (case-sensitive) match.
    pub fn lookup(&self, topic: &str) -> &QuestionSet {
        self.entries
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, set)| set)
            .unwrap_or_else(|| &self.entries[0].1)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == topic)
    }

    pub fn default_topic(&self) -> &str {
        &self.entries[0].0
    }

    /// Topic names in registration order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn entries(&self) -> &[(String, QuestionSet)] {
        &self.entries
    }

    /// Merge `other` over this bank. Topics present in both take `other`'s
    /// set and keep their position; new topics are appended.
    pub fn with_overrides(mut self, other: QuestionBank) -> Self {
        for (topic, set) in other.entries {
            match self.entries.iter_mut().find(|(name, _)| *name == topic) {
                Some(entry) => entry.1 = set,
                None => self.entries.push((topic, set)),
            }
        }
        self
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

type RawQuestion = (&'static str, [&'static str; 4], &'static str);

const REACT: &[RawQuestion] = &[
    (
        "What is React?",
        [
            "A JavaScript library for building user interfaces",
            "A programming language",
            "A database",
            "A CSS framework",
        ],
        "A JavaScript library for building user interfaces",
    ),
    (
        "Which hook is used for state management?",
        ["useState", "useEffect", "useContext", "useReducer"],
        "useState",
    ),
];

const JAVASCRIPT: &[RawQuestion] = &[
    (
        "What does JSON stand for?",
        [
            "JavaScript Object Notation",
            "Java Standard Object Notation",
            "JavaScript Oriented Notation",
            "None",
        ],
        "JavaScript Object Notation",
    ),
    (
        "Which method adds to an array?",
        ["push()", "pop()", "shift()", "unshift()"],
        "push()",
    ),
];

fn builtin_set(raw: &[RawQuestion]) -> QuestionSet {
    let questions = raw
        .iter()
        .map(|(text, options, answer)| Question {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: answer.to_string(),
        })
        .collect();
    QuestionSet::new(questions).expect("built-in question set is valid")
}
