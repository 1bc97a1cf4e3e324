//! Answer generation: retrieve, assemble the prompt, call the LLM,
//! fall back to keyword parsing when the call fails.

use std::sync::Arc;

use askrepo_index::retriever::{Retriever, build_context, sources};
use askrepo_llm::provider::{LlmProvider, Message};

use crate::fallback;

const NO_CONTEXT_MESSAGE: &str =
    "No relevant context found. Try a different question, or re-run `askrepo index`.";

/// Retrieval-augmented answer engine.
pub struct AnswerEngine<P> {
    retriever: Retriever<P>,
    provider: Arc<P>,
}

impl<P: LlmProvider> AnswerEngine<P> {
    #[must_use]
    pub fn new(retriever: Retriever<P>, provider: Arc<P>) -> Self {
        Self {
            retriever,
            provider,
        }
    }

    /// Answer a question about the indexed repository.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails. An LLM failure is not an
    /// error: the keyword fallback answers instead.
    pub async fn answer(&self, query: &str) -> anyhow::Result<String> {
        tracing::info!(query, "answering question");

        let chunks = self.retriever.retrieve(query).await?;
        if chunks.is_empty() {
            return Ok(NO_CONTEXT_MESSAGE.to_string());
        }

        let context = build_context(&chunks);
        let sources = sources(&chunks);
        let repository = repository_info(&sources);
        let prompt = build_prompt(query, &repository, &context);

        match self.provider.chat(&[Message::user(prompt)]).await {
            Ok(answer) => Ok(format!(
                "{}{}",
                answer.trim(),
                fallback::sources_footer(&sources)
            )),
            Err(e) => {
                tracing::error!("LLM call failed, using fallback: {e}");
                Ok(fallback::generate(query, &chunks, &sources))
            }
        }
    }
}

/// Identify the repository from the retrieved source paths: prefer a
/// README, then a package manifest, else the leading path segment.
#[must_use]
pub fn repository_info(sources: &[String]) -> String {
    let Some(first) = sources.first() else {
        return "Unknown repository".to_string();
    };

    if let Some(readme) = sources.iter().find(|s| s.contains("README.md")) {
        return format!("Repository with README: {readme}");
    }

    let manifests = ["package.json", "Cargo.toml", "pyproject.toml"];
    if let Some(manifest) = sources
        .iter()
        .find(|s| manifests.iter().any(|m| s.ends_with(m)))
    {
        return format!("Repository with manifest: {manifest}");
    }

    let name = first.split('/').next().unwrap_or(first);
    format!("Repository: {name}")
}

fn build_prompt(query: &str, repository: &str, context: &str) -> String {
    format!(
        "You are a helpful code documentation assistant. Based on the following \
code and documentation context, answer the user's question.

Current Repository: {repository}

Question: {query}

Context from the codebase:
{context}

Please provide a clear, detailed answer that:
1. Directly addresses the question
2. Explains technical concepts clearly
3. References specific parts of the code when relevant
4. Provides code examples if appropriate
5. Includes best practices and implementation details

Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use askrepo_index::retriever::RetrievalConfig;
    use askrepo_llm::mock::MockProvider;
    use askrepo_store::{MemoryVectorStore, VectorPoint, VectorStore};
    use std::collections::HashMap;

    async fn seeded_engine(provider: MockProvider) -> AnswerEngine<MockProvider> {
        let store = Arc::new(MemoryVectorStore::new());
        let vector = provider.embed("fn main() {}").await.unwrap();
        store
            .upsert(vec![VectorPoint {
                id: "p0".into(),
                vector,
                payload: HashMap::from([
                    ("text".to_string(), serde_json::json!("fn main() {}")),
                    ("file".to_string(), serde_json::json!("src/main.rs")),
                    ("chunk_number".to_string(), serde_json::json!(1)),
                ]),
            }])
            .unwrap();

        let provider = Arc::new(provider);
        let retriever = Retriever::new(store, Arc::clone(&provider), RetrievalConfig::default());
        AnswerEngine::new(retriever, provider)
    }

    #[tokio::test]
    async fn answer_appends_sources_footer() {
        let engine =
            seeded_engine(MockProvider::with_responses(vec!["It starts in main.".into()])).await;
        let answer = engine.answer("where does it start?").await.unwrap();
        assert!(answer.starts_with("It starts in main."));
        assert!(answer.contains("**Sources:** src/main.rs"));
    }

    #[tokio::test]
    async fn answer_empty_store_reports_no_context() {
        let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
        let provider = Arc::new(MockProvider::default());
        let retriever = Retriever::new(store, Arc::clone(&provider), RetrievalConfig::default());
        let engine = AnswerEngine::new(retriever, provider);

        let answer = engine.answer("anything").await.unwrap();
        assert!(answer.contains("No relevant context found"));
    }

    #[tokio::test]
    async fn llm_failure_falls_back() {
        let engine = seeded_engine(MockProvider::failing()).await;
        let answer = engine.answer("fn main() {}").await.unwrap();
        assert!(answer.contains("local fallback parsing"));
        assert!(answer.contains("**Sources:** src/main.rs"));
    }

    #[test]
    fn repository_info_prefers_readme() {
        let sources = vec!["src/lib.rs".to_string(), "docs/README.md".to_string()];
        assert_eq!(
            repository_info(&sources),
            "Repository with README: docs/README.md"
        );
    }

    #[test]
    fn repository_info_falls_back_to_manifest() {
        let sources = vec!["app/package.json".to_string()];
        assert_eq!(
            repository_info(&sources),
            "Repository with manifest: app/package.json"
        );
    }

    #[test]
    fn repository_info_uses_leading_segment() {
        let sources = vec!["backend/api/server.py".to_string()];
        assert_eq!(repository_info(&sources), "Repository: backend");
    }

    #[test]
    fn repository_info_unknown_when_empty() {
        assert_eq!(repository_info(&[]), "Unknown repository");
    }

    #[test]
    fn prompt_contains_question_and_context() {
        let prompt = build_prompt("how?", "Repository: x", "the context");
        assert!(prompt.contains("Question: how?"));
        assert!(prompt.contains("Current Repository: Repository: x"));
        assert!(prompt.contains("the context"));
        assert!(prompt.ends_with("Answer:"));
    }
}
