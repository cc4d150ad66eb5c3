//! Core trait definitions for LLM providers.
//!
//! The trait is implemented by the `quizforge-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for LLM backends that generate quiz text from prompts.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send one generation request. Implementations must not retry.
    ///
    /// Failures should be reported as `ProviderError` so callers can
    /// classify them.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// Request to generate text from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from an LLM generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// System prompt sent with quiz generation requests.
pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz author. Respond ONLY with the requested JSON. Do not include explanations or markdown formatting.";

/// Build the topic-parameterized prompt for `count` questions.
pub fn quiz_prompt(topic: &str, count: usize) -> String {
    format!(
        r#"Generate {count} multiple-choice quiz questions about {topic}.
Each question must have exactly 4 options and the answer must be one of them, copied exactly.
Format as JSON:
[
  {{
    "question": "string",
    "options": ["a", "b", "c", "d"],
    "answer": "correct option"
  }}
]"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_topic_and_count() {
        let prompt = quiz_prompt("Movies", 3);
        assert!(prompt.starts_with("Generate 3 multiple-choice quiz questions about Movies."));
        assert!(prompt.contains(r#""options": ["a", "b", "c", "d"]"#));
    }
}
