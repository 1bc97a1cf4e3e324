//! Query-time retrieval: embed the question, search the store, decode hits.

use std::sync::Arc;

use askrepo_llm::provider::LlmProvider;
use askrepo_store::{ScoredPoint, VectorStore};

use crate::error::Result;

/// Retrieval configuration.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks fetched per query.
    pub top_k: usize,
    /// Minimum cosine similarity to accept.
    pub score_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: 0.0,
        }
    }
}

/// A retrieved chunk with decoded payload.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub text: String,
    pub file: String,
    pub chunk_number: usize,
    pub score: f32,
}

impl RetrievedChunk {
    fn from_scored_point(point: &ScoredPoint) -> Option<Self> {
        let get_str = |key: &str| {
            point
                .payload
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        };
        let chunk_number = point
            .payload
            .get("chunk_number")
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())?;

        Some(Self {
            text: get_str("text")?,
            file: get_str("file")?,
            chunk_number,
            score: point.score,
        })
    }
}

/// Embedding-backed retriever over the chunk store.
pub struct Retriever<P> {
    store: Arc<dyn VectorStore>,
    provider: Arc<P>,
    config: RetrievalConfig,
}

impl<P: LlmProvider> Retriever<P> {
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>, provider: Arc<P>, config: RetrievalConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Retrieve the chunks most similar to `query`.
    ///
    /// An empty store yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query or searching fails.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        if self.store.is_empty()? {
            return Ok(Vec::new());
        }

        let vector = self.provider.embed(query).await?;
        let hits = self.store.search(&vector, self.config.top_k)?;

        let chunks: Vec<RetrievedChunk> = hits
            .iter()
            .filter_map(RetrievedChunk::from_scored_point)
            .filter(|c| c.score >= self.config.score_threshold)
            .collect();

        tracing::debug!(retrieved = chunks.len(), "retrieval complete");
        Ok(chunks)
    }
}

/// Join chunk texts for prompt injection.
#[must_use]
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Deduplicated source file paths, in retrieval order.
#[must_use]
pub fn sources(chunks: &[RetrievedChunk]) -> Vec<String> {
    let mut seen = Vec::new();
    for chunk in chunks {
        if !seen.contains(&chunk.file) {
            seen.push(chunk.file.clone());
        }
    }
    seen
}
