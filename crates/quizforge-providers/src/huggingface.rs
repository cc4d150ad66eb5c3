//! Hugging Face Inference API provider implementation.
//!
//! Raw text-generation endpoint: the prompt goes in as `inputs` and the
//! completion comes back as `generated_text`.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizforge_core::traits::{GenerateRequest, GenerateResponse, LlmProvider};

use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Hugging Face Inference API provider.
pub struct HuggingFaceProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(api_key: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f64,
    return_full_text: bool,
}

/// The endpoint answers with either a list of generations or a single one.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Many(Vec<Generation>),
    One(Generation),
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let start = Instant::now();

        let inputs = match &request.system_prompt {
            Some(system) => format!("{system}\n\n{}", request.prompt),
            None => request.prompt.clone(),
        };

        let body = InferenceRequest {
            inputs,
            parameters: InferenceParameters {
                max_new_tokens: request.max_tokens,
                temperature: request.temperature,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}", self.base_url, request.model))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_ms: 5000,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status >= 400 {
            // 503 while the model is loading; the body carries an estimate
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: InferenceResponse = response.json().await.map_err(|e| {
            ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let content = match api_response {
            InferenceResponse::Many(generations) => generations
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| ProviderError::ApiError {
                    status: 0,
                    message: "response has no generations".to_string(),
                })?,
            InferenceResponse::One(generation) => generation.generated_text,
        };

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
