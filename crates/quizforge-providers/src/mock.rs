//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use quizforge_core::traits::{GenerateRequest, GenerateResponse, LlmProvider};

use crate::error::ProviderError;

/// What the mock does when no prompt mapping matches.
#[derive(Debug, Clone)]
enum Fallthrough {
    Respond(String),
    NetworkError,
    Status(u16),
}

/// A mock LLM provider for exercising the gateway without real API calls.
///
/// Returns configurable responses based on prompt content matching, or
/// fails in a configurable way.
pub struct MockProvider {
    /// Map of prompt substring → response content.
    responses: HashMap<String, String>,
    /// Behaviour if no prompt matches.
    fallthrough: Fallthrough,
    /// Simulated latency.
    delay: Duration,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    fn with_fallthrough(responses: HashMap<String, String>, fallthrough: Fallthrough) -> Self {
        Self {
            responses,
            fallthrough,
            delay: Duration::ZERO,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a new mock provider with the given prompt→response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self::with_fallthrough(responses, Fallthrough::Respond("[]".to_string()))
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self::with_fallthrough(HashMap::new(), Fallthrough::Respond(response.to_string()))
    }

    /// Create a mock whose every request fails at the transport level.
    pub fn unreachable() -> Self {
        Self::with_fallthrough(HashMap::new(), Fallthrough::NetworkError)
    }

    /// Create a mock whose every request gets the given HTTP status.
    pub fn failing_with_status(status: u16) -> Self {
        Self::with_fallthrough(HashMap::new(), Fallthrough::Status(status))
    }

    /// Delay each response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        // Find a matching response based on prompt content
        let matched = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone());

        let content = match (matched, &self.fallthrough) {
            (Some(content), _) => content,
            (None, Fallthrough::Respond(content)) => content.clone(),
            (None, Fallthrough::NetworkError) => {
                return Err(ProviderError::NetworkError("connection refused".into()).into())
            }
            (None, Fallthrough::Status(status)) => {
                return Err(ProviderError::ApiError {
                    status: *status,
                    message: "mock failure".into(),
                }
                .into())
            }
        };

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            latency_ms: self.delay.as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "mock".into(),
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("[1]");
        let response = provider.generate(&request("anything")).await.unwrap();
        assert_eq!(response.content, "[1]");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("React".to_string(), "react quiz".to_string());
        responses.insert("Python".to_string(), "python quiz".to_string());

        let provider = MockProvider::new(responses);

        let resp = provider.generate(&request("questions about React")).await.unwrap();
        assert_eq!(resp.content, "react quiz");

        let resp = provider.generate(&request("questions about Python")).await.unwrap();
        assert_eq!(resp.content, "python quiz");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn failures() {
        let err = MockProvider::unreachable()
            .generate(&request("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::NetworkError(_))
        ));

        let err = MockProvider::failing_with_status(502)
            .generate(&request("x"))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProviderError>().and_then(|e| e.status()),
            Some(502)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_response() {
        let provider = MockProvider::with_fixed_response("late").with_delay(Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        provider.generate(&request("x")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
