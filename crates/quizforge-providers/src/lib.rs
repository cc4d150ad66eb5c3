//! quizforge-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI chat completions and the
//! Hugging Face Inference API, and loads provider configuration.

pub mod config;
pub mod error;
pub mod huggingface;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config_from, ProviderConfig, QuizforgeConfig};
pub use error::ProviderError;
