// QA orchestrator
// Orchestrates: Parse -> Format -> Chunk -> Embed -> Index, then per question Embed -> Retrieve -> Prompt -> LLM

use std::fmt;
use std::sync::Arc;

use logqa_core::{format_entries, Chunker, CoreError, LogParser};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RagConfig;
use crate::index::VectorIndex;
use crate::llm_client::{EmbeddingProvider, LlmClient, ProviderError};
use crate::prompt::{build_context, build_prompt};

/// Which external call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Indexing,
    Retrieval,
    Completion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Embedding => "embedding",
            Stage::Indexing => "indexing",
            Stage::Retrieval => "retrieval",
            Stage::Completion => "completion",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum RagError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{stage} provider failed: {source}")]
    Provider {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    #[error("No log context loaded")]
    NoContext,
}

impl RagError {
    fn at(stage: Stage) -> impl FnOnce(ProviderError) -> RagError {
        move |source| RagError::Provider { stage, source }
    }
}

/// What one load produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub entries: usize,
    pub diagnostics: usize,
    pub skipped: usize,
    pub chunks: usize,
}

/// Answer with the chunks it was built from
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

pub struct QaOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Box<dyn VectorIndex>,
    llm: Arc<dyn LlmClient>,
    parser: LogParser,
    chunker: Chunker,
    top_k: usize,
}

impl QaOrchestrator {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Box<dyn VectorIndex>,
        llm: Arc<dyn LlmClient>,
        config: &RagConfig,
    ) -> Result<Self, RagError> {
        let chunker = Chunker::new(config.chunking.to_chunker_config())?;

        Ok(Self {
            embedder,
            index,
            llm,
            parser: LogParser::new(),
            chunker,
            top_k: config.retrieval.top_k.max(1),
        })
    }

    /// provider name/model of the completion backend
    pub fn llm(&self) -> &dyn LlmClient {
        &*self.llm
    }

    /// Parse, format and chunk `raw`, then embed and index the chunks.
    /// Replaces whatever was loaded before. An embedding failure leaves the
    /// previous context in place.
    pub async fn load(&mut self, raw: &str) -> Result<LoadSummary, RagError> {
        let report = self.parser.parse(raw);
        let context = format_entries(&report.entries);
        let chunks = self.chunker.split(&context);

        let summary = LoadSummary {
            entries: report.entries.len(),
            diagnostics: report.diagnostics.len(),
            skipped: report.skipped,
            chunks: chunks.len(),
        };

        if report.is_empty() {
            warn!("No log entries parsed, nothing to index");
            self.index.clear();
            return Ok(summary);
        }

        // embed before touching the index so a failed reload keeps the old context
        let vectors = self.embed(&chunks).await?;
        self.index.clear();
        self.index
            .index(chunks, vectors)
            .await
            .map_err(RagError::at(Stage::Indexing))?;

        info!(
            entries = summary.entries,
            diagnostics = summary.diagnostics,
            skipped = summary.skipped,
            chunks = summary.chunks,
            "Log context indexed"
        );
        Ok(summary)
    }

    /// Answer one question against the loaded context
    pub async fn ask(&self, question: &str) -> Result<Answer, RagError> {
        if self.index.is_empty() {
            return Err(RagError::NoContext);
        }

        let query = self
            .embed(&[question.to_string()])
            .await?
            .pop()
            // embed() already checked there is exactly one vector
            .ok_or(RagError::NoContext)?;

        let sources = self
            .index
            .retrieve(&query, self.top_k)
            .await
            .map_err(RagError::at(Stage::Retrieval))?;
        debug!(sources = sources.len(), "Retrieved chunks");

        let prompt = build_prompt(&build_context(&sources), question);
        let text = self
            .llm
            .generate(&prompt)
            .await
            .map_err(RagError::at(Stage::Completion))?;

        info!(
            provider = self.llm.provider(),
            model = self.llm.model(),
            sources = sources.len(),
            "Question answered"
        );
        Ok(Answer { text, sources })
    }

    /// One-shot: load `raw` and answer `question`
    pub async fn answer(&mut self, raw: &str, question: &str) -> Result<String, RagError> {
        self.load(raw).await?;
        Ok(self.ask(question).await?.text)
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let vectors = self
            .embedder
            .embed(texts)
            .await
            .map_err(RagError::at(Stage::Embedding))?;

        if vectors.len() != texts.len() {
            return Err(RagError::at(Stage::Embedding)(ProviderError::InvalidResponse(format!(
                "asked for {} embeddings, got {}",
                texts.len(),
                vectors.len()
            ))));
        }
        Ok(vectors)
    }
}
