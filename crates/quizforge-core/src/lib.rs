//! quizforge-core: quiz model, question bank, session state machine and
//! generation gateway.
//!
//! This crate holds all quiz logic. Providers and the terminal front end
//! build on it.

pub mod bank;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod traits;
pub mod translate;

pub use bank::QuestionBank;
pub use controller::{DeliveryOutcome, QuizController};
pub use error::{ProviderError, QuizError, SessionError};
pub use gateway::{GatewayConfig, GenerationFailure, QuizGateway, QuizSource, Resolved};
pub use model::{Question, QuestionSet};
pub use scoring::{QuizResult, ResultTier};
pub use session::{Mode, SessionState};
