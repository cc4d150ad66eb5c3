//! Core data model types for quizforge.
//!
//! A `QuestionSet` can only be built from valid questions, so any value of
//! that type is safe to hand to a quiz session.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Number of options every multiple-choice question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to the user.
    pub text: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// The correct option, compared by exact string equality.
    #[serde(alias = "answer")]
    pub correct_answer: String,
}

impl Question {
    /// Build a question, checking its invariants.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuizError> {
        let question = Self {
            text: text.into(),
            options,
            correct_answer: correct_answer.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Check that the question has text, exactly four options and a correct
    /// answer that is one of them.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::EmptyText);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuizError::WrongOptionCount {
                text: self.text.clone(),
                count: self.options.len(),
            });
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(QuizError::AnswerNotInOptions {
                text: self.text.clone(),
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}

/// An ordered, non-empty list of valid questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        for question in &questions {
            question.validate()?;
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl TryFrom<Vec<Question>> for QuestionSet {
    type Error = QuizError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionSet> for Vec<Question> {
    fn from(set: QuestionSet) -> Self {
        set.questions
    }
}

impl Index<usize> for QuestionSet {
    type Output = Question;

    fn index(&self, index: usize) -> &Question {
        &self.questions[index]
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
