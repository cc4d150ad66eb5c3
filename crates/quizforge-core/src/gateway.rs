//! Quiz generation gateway.
//!
//! Makes a single generation request per quiz and falls back to the
//! question bank when the provider is missing, fails, or answers with
//! something that does not translate into questions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::bank::QuestionBank;
use crate::error::ProviderError;
use crate::model::QuestionSet;
use crate::traits::{quiz_prompt, GenerateRequest, LlmProvider, QUIZ_SYSTEM_PROMPT};
use crate::translate::translate_questions;

/// Configuration for the generation gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Number of questions requested.
    pub question_count: usize,
    /// How long the loading screen stays up before fallback questions show.
    pub fallback_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            question_count: 3,
            fallback_delay: Duration::from_secs(2),
        }
    }
}

/// Why generated questions were not used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    /// No provider is configured (e.g. no API key).
    #[error("no inference provider configured")]
    Unavailable,

    /// The request never got a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The response could not be decoded into questions.
    #[error("unusable response: {0}")]
    Malformed(String),
}

impl GenerationFailure {
    /// Classify an error returned by an `LlmProvider`.
    pub fn classify(err: &anyhow::Error) -> Self {
        let Some(provider_err) = err.downcast_ref::<ProviderError>() else {
            return GenerationFailure::Transport(format!("{err:#}"));
        };
        if let Some(status) = provider_err.status() {
            return GenerationFailure::Status(status);
        }
        match provider_err {
            ProviderError::ApiError { message, .. } => GenerationFailure::Malformed(message.clone()),
            other => GenerationFailure::Transport(other.to_string()),
        }
    }
}

/// Where the questions of a quiz came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    /// Generated by the named provider.
    Generated { provider: String },
    /// Taken from the question bank.
    Fallback(GenerationFailure),
}

impl QuizSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, QuizSource::Fallback(_))
    }
}

/// Questions ready to be shown, with their origin.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub questions: QuestionSet,
    pub source: QuizSource,
}

/// The generation gateway.
pub struct QuizGateway {
    provider: Option<Arc<dyn LlmProvider>>,
    bank: Arc<QuestionBank>,
    config: GatewayConfig,
}

impl QuizGateway {
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        bank: Arc<QuestionBank>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            provider,
            bank,
            config,
        }
    }

    /// A gateway that always serves the question bank.
    pub fn offline(bank: Arc<QuestionBank>, config: GatewayConfig) -> Self {
        Self::new(None, bank, config)
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// One generation attempt for `topic`, without fallback.
    #[instrument(skip(self), fields(model = %self.config.model))]
    pub async fn request_quiz(&self, topic: &str) -> Result<QuestionSet, GenerationFailure> {
        let provider = self.provider.as_ref().ok_or(GenerationFailure::Unavailable)?;

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: quiz_prompt(topic, self.config.question_count),
            system_prompt: Some(QUIZ_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = provider
            .generate(&request)
            .await
            .map_err(|e| GenerationFailure::classify(&e))?;

        translate_questions(&response.content)
            .map_err(|e| GenerationFailure::Malformed(e.to_string()))
    }

    /// Generated questions when possible, otherwise the bank's set for
    /// `topic` after the fixed fallback delay.
    pub async fn resolve(&self, topic: &str) -> Resolved {
        let start = Instant::now();

        match self.request_quiz(topic).await {
            Ok(questions) => {
                let provider = self.provider_name().unwrap_or_default().to_string();
                info!(
                    topic,
                    provider = %provider,
                    questions = questions.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "using generated quiz"
                );
                Resolved {
                    questions,
                    source: QuizSource::Generated { provider },
                }
            }
            Err(failure) => {
                warn!(topic, reason = %failure, "generation failed, using question bank");
                tokio::time::sleep(self.config.fallback_delay).await;
                Resolved {
                    questions: self.bank.lookup(topic).clone(),
                    source: QuizSource::Fallback(failure),
                }
            }
        }
    }
}
