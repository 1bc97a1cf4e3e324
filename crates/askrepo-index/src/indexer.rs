//! Repository indexing orchestrator: walk → chunk → embed → store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use askrepo_llm::provider::LlmProvider;
use askrepo_store::{VectorPoint, VectorStore};

use crate::chunker::chunk_file;
use crate::error::{IndexError, Result};
use crate::files::{collect_files, detect_kind};

/// Indexer configuration.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Files larger than this are skipped with a warning.
    pub max_file_bytes: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1_048_576,
        }
    }
}

/// Summary of an indexing run.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub chunks_stored: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Orchestrates indexing over a repository tree.
pub struct Indexer<P> {
    store: Arc<dyn VectorStore>,
    provider: Arc<P>,
    config: IndexerConfig,
}

impl<P: LlmProvider> Indexer<P> {
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>, provider: Arc<P>, config: IndexerConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Index every supported file under `root`, replacing prior contents.
    ///
    /// Per-file failures land in the report; only store-level failures on
    /// the initial clear abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub async fn index_repository(&self, root: &Path) -> Result<IndexReport> {
        let start = std::time::Instant::now();
        let mut report = IndexReport::default();

        self.store.clear()?;

        let files = collect_files(root);
        let total = files.len();
        tracing::info!(total, "indexing started");

        for (i, path) in files.iter().enumerate() {
            report.files_scanned += 1;
            let rel_path = relative_path(root, path);

            match self.index_file(path, &rel_path).await {
                Ok(stored) => {
                    if stored > 0 {
                        report.files_indexed += 1;
                    }
                    report.chunks_stored += stored;
                    tracing::info!(
                        file = %rel_path,
                        progress = format_args!("{}/{total}", i + 1),
                        stored,
                    );
                }
                Err(e) => {
                    report.errors.push(format!("{rel_path}: {e}"));
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        Ok(report)
    }

    async fn index_file(&self, abs_path: &Path, rel_path: &str) -> Result<usize> {
        let kind = detect_kind(abs_path).ok_or(IndexError::UnsupportedFile)?;

        let metadata = tokio::fs::metadata(abs_path).await?;
        if metadata.len() > self.config.max_file_bytes {
            tracing::warn!(file = %rel_path, bytes = metadata.len(), "skipping oversized file");
            return Ok(0);
        }

        let bytes = tokio::fs::read(abs_path).await?;
        let source = String::from_utf8_lossy(&bytes);

        let chunks = chunk_file(&source, kind);
        if chunks.is_empty() {
            tracing::warn!(file = %rel_path, "no chunks to embed");
            return Ok(0);
        }

        let mut points = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let vector = self.provider.embed(chunk).await?;
            points.push(VectorPoint {
                id: uuid::Uuid::new_v4().to_string(),
                vector,
                payload: chunk_payload(chunk, rel_path, i + 1),
            });
        }

        let stored = points.len();
        self.store.upsert(points)?;
        tracing::debug!(file = %rel_path, stored, "chunks stored");
        Ok(stored)
    }
}

/// Root-relative path with forward slashes, for stable payload metadata.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn chunk_payload(
    text: &str,
    file: &str,
    chunk_number: usize,
) -> HashMap<String, serde_json::Value> {
    HashMap::from([
        ("text".to_string(), serde_json::json!(text)),
        ("file".to_string(), serde_json::json!(file)),
        ("chunk_number".to_string(), serde_json::json!(chunk_number)),
    ])
}
