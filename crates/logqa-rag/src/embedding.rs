// Local embeddings with fastembed (AllMiniLML6V2, 384 dimensions)
// the model is CPU bound so calls run on the blocking pool

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::llm_client::{EmbeddingProvider, ProviderError};

pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedProvider {
    pub fn new() -> Result<Self, ProviderError> {
        info!("Loading fastembed model AllMiniLML6V2");
        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| ProviderError::ApiError(format!("failed to load embedding model: {}", e)))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| ProviderError::ApiError("embedding model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| ProviderError::ApiError(e.to_string()))
        })
        .await
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))?
    }
}
