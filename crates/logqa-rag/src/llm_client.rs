// Provider interfaces
// the orchestrator only talks to these traits, concrete clients are injected

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Index error: {0}")]
    Index(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Completion provider: prompt in, generated text out
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    fn model(&self) -> &str;

    fn provider(&self) -> &str;
}

/// Embedding provider: one vector per input text, same order
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}
