// LogQA RAG - answer questions about a log file with retrieval-augmented generation

pub mod config;
#[cfg(feature = "fastembed")]
pub mod embedding;
pub mod engine;
pub mod index;
pub mod llm_client;
pub mod ollama_client;
pub mod openai_client;
pub mod prompt;

pub use config::{EmbeddingBackend, LlmProvider, RagConfig};
#[cfg(feature = "fastembed")]
pub use embedding::FastEmbedProvider;
pub use engine::{Answer, LoadSummary, QaOrchestrator, RagError, Stage};
pub use index::{MemoryIndex, VectorIndex};
pub use llm_client::{EmbeddingProvider, LlmClient, ProviderError};
pub use ollama_client::OllamaClient;
pub use openai_client::OpenAiClient;
