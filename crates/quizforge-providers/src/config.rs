//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::gateway::GatewayConfig;
use quizforge_core::traits::LlmProvider;

use crate::huggingface::HuggingFaceProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    HuggingFace {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::HuggingFace {
                api_key: _,
                base_url,
            } => f
                .debug_struct("HuggingFace")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

impl ProviderConfig {
    fn api_key(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { api_key, .. } | ProviderConfig::HuggingFace { api_key, .. } => {
                api_key
            }
        }
    }

    /// Whether a non-empty API key is present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key().trim().is_empty()
    }

    /// Model used when the config does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderConfig::OpenAI { .. } => "gpt-4o-mini",
            ProviderConfig::HuggingFace { .. } => "microsoft/DialoGPT-medium",
        }
    }
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model override; each provider has its own default.
    #[serde(default)]
    pub default_model: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens for generation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Questions requested per quiz.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Loading delay before fallback questions show, in milliseconds.
    #[serde(default = "default_fallback_delay")]
    pub fallback_delay_ms: u64,
    /// Extra question bank merged over the built-in one.
    #[serde(default)]
    pub bank_path: Option<PathBuf>,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_question_count() -> usize {
    3
}
fn default_fallback_delay() -> u64 {
    2000
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            question_count: default_question_count(),
            fallback_delay_ms: default_fallback_delay(),
            bank_path: None,
        }
    }
}

impl QuizforgeConfig {
    /// The provider to generate with: `name`, or the default provider, if it
    /// is configured with credentials. `None` means quizzes come from the
    /// question bank only.
    pub fn select_provider<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Option<(&'a str, &'a ProviderConfig)> {
        let name = name.unwrap_or(self.default_provider.as_str());
        self.providers
            .get(name)
            .filter(|config| config.has_credentials())
            .map(|config| (name, config))
    }

    /// Gateway settings for generating with `provider`.
    pub fn gateway_config(&self, provider: Option<&ProviderConfig>) -> GatewayConfig {
        let model = self
            .default_model
            .clone()
            .or_else(|| provider.map(|p| p.default_model().to_string()))
            .unwrap_or_else(|| GatewayConfig::default().model);

        GatewayConfig {
            model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            question_count: self.question_count,
            fallback_delay: Duration::from_millis(self.fallback_delay_ms),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + len];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::HuggingFace { api_key, base_url } => ProviderConfig::HuggingFace {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without a path:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable overrides: `QUIZFORGE_OPENAI_KEY`, `QUIZFORGE_HUGGINGFACE_KEY`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::default(),
    };

    Ok(apply_env_overrides(config))
}

/// Parse a TOML config string and resolve `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<QuizforgeConfig> {
    let mut config: QuizforgeConfig = toml::from_str(content)?;

    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn apply_env_overrides(mut config: QuizforgeConfig) -> QuizforgeConfig {
    if let Ok(key) = std::env::var("QUIZFORGE_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("QUIZFORGE_HUGGINGFACE_KEY") {
        config
            .providers
            .entry("huggingface".into())
            .or_insert(ProviderConfig::HuggingFace {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::HuggingFace { api_key, .. }) =
            config.providers.get_mut("huggingface")
        {
            *api_key = key;
        }
    }

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        ))),
        ProviderConfig::HuggingFace { api_key, base_url } => Ok(Box::new(
            HuggingFaceProvider::new(api_key, base_url.clone()),
        )),
    }
}
