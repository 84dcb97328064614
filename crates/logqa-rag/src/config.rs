//! RAG configuration: which backends to use and how to chunk/retrieve

use std::sync::Arc;

use logqa_core::{ChunkerConfig, OversizePolicy};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm_client::{EmbeddingProvider, LlmClient, ProviderError};
use crate::ollama_client::OllamaClient;
use crate::openai_client::OpenAiClient;

/// LLM Provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Ollama,
    OpenAi,
}

/// Where chunk embeddings come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Ollama,
    FastEmbed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub provider: LlmProvider,
    pub embedding: EmbeddingBackend,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub ollama: OllamaSettings,
    pub openai: OpenAiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub overlap: usize,
    // cut unbroken lines at chunk_size instead of keeping them whole
    pub hard_limit: bool,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 0,
            hard_limit: false,
        }
    }
}

impl ChunkingSettings {
    pub fn to_chunker_config(&self) -> ChunkerConfig {
        let policy = if self.hard_limit {
            OversizePolicy::Hard
        } else {
            OversizePolicy::Keep
        };
        ChunkerConfig::new(self.chunk_size, self.overlap).with_policy(policy)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
    pub temperature: f32,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            embedding_model: "llama3".to_string(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            url: OpenAiClient::DEFAULT_BASE_URL.to_string(),
            model: "gpt-4".to_string(),
            temperature: 1.0,
            max_tokens: 2048,
            top_p: 1.0,
        }
    }
}

impl RagConfig {
    /// Apply OLLAMA_URL / OLLAMA_MODEL when they are set.
    ///
    /// Precedence, highest first: command-line flags, environment, config
    /// file, built-in defaults.
    pub fn apply_env(&mut self) {
        self.apply_ollama_overrides(
            std::env::var("OLLAMA_URL").ok(),
            std::env::var("OLLAMA_MODEL").ok(),
        );
    }

    /// Replace the Ollama host and model with any value given, logging what changed
    pub fn apply_ollama_overrides(&mut self, url: Option<String>, model: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            if url != self.ollama.url {
                info!(from = %self.ollama.url, to = %url, "OLLAMA_URL overrides configured url");
            }
            self.ollama.url = url;
        }
        if let Some(model) = model.filter(|m| !m.is_empty()) {
            if model != self.ollama.model {
                info!(from = %self.ollama.model, to = %model, "OLLAMA_MODEL overrides configured model");
            }
            self.ollama.model = model;
        }
    }

    fn ollama_client(&self) -> OllamaClient {
        OllamaClient::new(&self.ollama.url, &self.ollama.model)
            .with_embedding_model(&self.ollama.embedding_model)
            .with_temperature(self.ollama.temperature)
    }

    /// Build the completion client for the selected provider
    pub fn llm_client(&self) -> Result<Arc<dyn LlmClient>, ProviderError> {
        match self.provider {
            LlmProvider::Ollama => Ok(Arc::new(self.ollama_client())),
            LlmProvider::OpenAi => {
                let client = OpenAiClient::from_env(&self.openai.model)?
                    .with_base_url(&self.openai.url)
                    .with_sampling(self.openai.temperature, self.openai.max_tokens, self.openai.top_p);
                Ok(Arc::new(client))
            }
        }
    }

    /// Build the embedding provider for the selected backend
    pub fn embedder(&self) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
        match self.embedding {
            EmbeddingBackend::Ollama => Ok(Arc::new(self.ollama_client())),
            #[cfg(feature = "fastembed")]
            EmbeddingBackend::FastEmbed => Ok(Arc::new(crate::embedding::FastEmbedProvider::new()?)),
            #[cfg(not(feature = "fastembed"))]
            EmbeddingBackend::FastEmbed => Err(ProviderError::ApiError(
                "built without the `fastembed` feature".to_string(),
            )),
        }
    }
}
