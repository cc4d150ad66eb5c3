//! Provider error types.
//!
//! Re-exported from `quizforge-core`, where the gateway classifies them.

pub use quizforge_core::error::ProviderError;
