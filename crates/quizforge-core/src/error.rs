//! Error types shared across quizforge.
//!
//! `ProviderError` lives here rather than in `quizforge-providers` so the
//! generation gateway can downcast provider failures and classify them
//! without string matching.

use thiserror::Error;

use crate::session::Mode;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response. `status` is 0 when the request
    /// succeeded but the body could not be decoded.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// HTTP status associated with this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::RateLimited { .. } => Some(429),
            ProviderError::AuthenticationFailed(_) => Some(401),
            ProviderError::ApiError { status, .. } if *status > 0 => Some(*status),
            _ => None,
        }
    }
}

/// Violations of the question model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("question {text:?} has {count} options, expected 4")]
    WrongOptionCount { text: String, count: usize },

    #[error("correct answer {answer:?} is not one of the options of {text:?}")]
    AnswerNotInOptions { text: String, answer: String },

    #[error("question text is empty")]
    EmptyText,

    #[error("question set is empty")]
    EmptyQuestionSet,

    #[error("question bank has no topics")]
    EmptyBank,

    #[error("topic registered twice: {0}")]
    DuplicateTopic(String),
}

/// Contract violations of the session state machine.
///
/// These are programming errors in the presentation layer, never
/// user-facing conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {event} while in {mode} mode")]
    InvalidTransition { event: &'static str, mode: Mode },

    #[error("questions ready with an empty question set")]
    EmptyQuestionSet,

    #[error("questions ready with an invalid question set: {0}")]
    InvalidQuestions(QuizError),
}
