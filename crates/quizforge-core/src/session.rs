//! Quiz session state machine.
//!
//! `SessionState::apply` is a pure transition function from a state and an
//! event to the next state. `SessionState::dispatch` is the in-place form
//! used by the controller.
//!
//! Every `SelectTopic` hands out a new generation token. Questions delivered
//! with an older token, or after the session left `Loading`, are discarded,
//! so a slow generation request cannot overwrite a session that has been
//! reset in the meantime.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{QuizError, SessionError};
use crate::model::{Question, QuestionSet};
use crate::scoring::QuizResult;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    TopicSelect,
    Loading,
    Quiz,
    Result,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::TopicSelect => write!(f, "topic-select"),
            Mode::Loading => write!(f, "loading"),
            Mode::Quiz => write!(f, "quiz"),
            Mode::Result => write!(f, "result"),
        }
    }
}

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SelectTopic(String),
    QuestionsReady {
        generation: u64,
        questions: QuestionSet,
    },
    SubmitAnswer(String),
    Reset,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::SelectTopic(_) => "select a topic",
            SessionEvent::QuestionsReady { .. } => "accept questions",
            SessionEvent::SubmitAnswer(_) => "submit an answer",
            SessionEvent::Reset => "reset",
        }
    }
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A topic was selected; questions must be delivered with this token.
    Loading { generation: u64 },
    /// Questions were accepted and the quiz began.
    QuizStarted { total: usize },
    /// An answer was recorded. `finished` is set on the last question.
    Answered { correct: bool, finished: bool },
    /// A stale question delivery was ignored.
    Discarded,
    Reset,
}

/// Result of a transition: the next state and what happened.
#[derive(Debug, Clone)]
pub struct Step {
    pub state: SessionState,
    pub outcome: Outcome,
}

/// Snapshot of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    mode: Mode,
    topic: String,
    questions: Option<QuestionSet>,
    current_index: usize,
    score: usize,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the state that follows `event`, leaving `self` untouched.
    pub fn apply(&self, event: SessionEvent) -> Result<Step, SessionError> {
        let mut next = self.clone();

        let outcome = match (self.mode, event) {
            (_, SessionEvent::Reset) => {
                next = SessionState {
                    generation: self.generation,
                    ..SessionState::default()
                };
                Outcome::Reset
            }
            (Mode::TopicSelect, SessionEvent::SelectTopic(topic)) => {
                next = SessionState {
                    mode: Mode::Loading,
                    topic,
                    generation: self.generation + 1,
                    ..SessionState::default()
                };
                Outcome::Loading {
                    generation: next.generation,
                }
            }
            (
                Mode::Loading,
                SessionEvent::QuestionsReady {
                    generation,
                    questions,
                },
            ) if generation == self.generation => {
                let total = questions.len();
                next.mode = Mode::Quiz;
                next.questions = Some(questions);
                next.current_index = 0;
                next.score = 0;
                Outcome::QuizStarted { total }
            }
            // A delivery for an older request, or one arriving after a reset.
            (_, SessionEvent::QuestionsReady { .. }) => Outcome::Discarded,
            (Mode::Quiz, SessionEvent::SubmitAnswer(option)) => {
                let questions = self
                    .questions
                    .as_ref()
                    .ok_or(SessionError::InvalidTransition {
                        event: "submit an answer",
                        mode: self.mode,
                    })?;
                let correct = questions[self.current_index].is_correct(&option);
                if correct {
                    next.score += 1;
                }
                let finished = self.current_index + 1 >= questions.len();
                if finished {
                    next.mode = Mode::Result;
                } else {
                    next.current_index += 1;
                }
                Outcome::Answered { correct, finished }
            }
            (mode, event) => {
                return Err(SessionError::InvalidTransition {
                    event: event.name(),
                    mode,
                })
            }
        };

        Ok(Step {
            state: next,
            outcome,
        })
    }

    /// Apply `event` in place.
    pub fn dispatch(&mut self, event: SessionEvent) -> Result<Outcome, SessionError> {
        let Step { state, outcome } = self.apply(event)?;
        debug!(from = %self.mode, to = %state.mode, ?outcome, "session transition");
        *self = state;
        Ok(outcome)
    }

    /// Enter `Loading` for `topic`; returns the generation token the
    /// questions must be delivered with.
    pub fn select_topic(&mut self, topic: impl Into<String>) -> Result<u64, SessionError> {
        self.dispatch(SessionEvent::SelectTopic(topic.into()))?;
        Ok(self.generation)
    }

    pub fn questions_ready(
        &mut self,
        generation: u64,
        questions: QuestionSet,
    ) -> Result<Outcome, SessionError> {
        self.dispatch(SessionEvent::QuestionsReady {
            generation,
            questions,
        })
    }

    /// `questions_ready` for an unchecked list of questions.
    pub fn questions_ready_from(
        &mut self,
        generation: u64,
        questions: Vec<Question>,
    ) -> Result<Outcome, SessionError> {
        let set = QuestionSet::new(questions).map_err(|e| match e {
            QuizError::EmptyQuestionSet => SessionError::EmptyQuestionSet,
            other => SessionError::InvalidQuestions(other),
        })?;
        self.questions_ready(generation, set)
    }

    pub fn submit_answer(&mut self, option: impl Into<String>) -> Result<Outcome, SessionError> {
        self.dispatch(SessionEvent::SubmitAnswer(option.into()))
    }

    pub fn reset(&mut self) {
        // Reset is valid from every mode.
        let _ = self.dispatch(SessionEvent::Reset);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The question on screen, only while in `Quiz` mode.
    pub fn current_question(&self) -> Option<&Question> {
        if self.mode != Mode::Quiz {
            return None;
        }
        self.questions.as_ref()?.get(self.current_index)
    }

    /// The final result, only in `Result` mode.
    pub fn result(&self) -> Option<QuizResult> {
        if self.mode != Mode::Result {
            return None;
        }
        let total = self.questions.as_ref()?.len();
        Some(QuizResult::new(self.score, total))
    }
}
