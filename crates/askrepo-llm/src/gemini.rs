//! Google Generative Language API backend (`generateContent` / `embedContent`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message, Role};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    embedding_model: Option<String>,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .finish_non_exhaustive()
    }
}

impl Clone for GeminiProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            embedding_model: self.embedding_model.clone(),
        }
    }
}

impl GeminiProvider {
    #[must_use]
    pub fn new(
        api_key: String,
        mut base_url: String,
        model: String,
        embedding_model: Option<String>,
    ) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: crate::http::default_client(),
            api_key,
            base_url,
            model,
            embedding_model,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    content: Content<'a>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

fn build_request(messages: &[Message]) -> GenerateRequest<'_> {
    let mut contents = Vec::new();
    let mut system_parts = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system_parts.push(Part {
                text: &message.content,
            }),
            Role::User => contents.push(Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &message.content,
                }],
            }),
            Role::Assistant => contents.push(Content {
                role: Some("model"),
                parts: vec![Part {
                    text: &message.content,
                }],
            }),
        }
    }

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(Content {
            role: None,
            parts: system_parts,
        })
    };

    GenerateRequest {
        contents,
        system_instruction,
    }
}

impl LlmProvider for GeminiProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let body = build_request(messages);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error {status}: {message}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse { provider: "gemini" });
        }
        Ok(text)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let Some(model) = self.embedding_model.as_deref() else {
            return Err(LlmError::EmbedUnsupported { provider: "gemini" });
        };

        let body = EmbedRequest {
            content: Content {
                role: None,
                parts: vec![Part { text }],
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{model}:embedContent", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Gemini embedding API error {status}: {message}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbedResponse = response.json().await?;
        if parsed.embedding.values.is_empty() {
            return Err(LlmError::EmptyResponse { provider: "gemini" });
        }
        Ok(parsed.embedding.values)
    }

    fn supports_embeddings(&self) -> bool {
        self.embedding_model.is_some()
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: String, embedding_model: Option<String>) -> GeminiProvider {
        GeminiProvider::new("test-key".into(), base_url, "gemini-test".into(), embedding_model)
    }

    #[test]
    fn debug_redacts_api_key() {
        let p = provider(DEFAULT_BASE_URL.into(), None);
        let debug = format!("{p:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn new_trims_trailing_slashes() {
        let p = provider("https://example.com/v1beta///".into(), None);
        let debug = format!("{p:?}");
        assert!(debug.contains("https://example.com/v1beta\""));
    }

    #[test]
    fn supports_embeddings_requires_model() {
        assert!(!provider(DEFAULT_BASE_URL.into(), None).supports_embeddings());
        assert!(
            provider(DEFAULT_BASE_URL.into(), Some("text-embedding-004".into()))
                .supports_embeddings()
        );
    }

    #[test]
    fn build_request_splits_system_instruction() {
        let messages = vec![
            Message::system("be terse"),
            Message::user("hi"),
            Message::assistant("hello"),
        ];
        let request = build_request(&messages);
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role, Some("user"));
        assert_eq!(request.contents[1].role, Some("model"));
        assert!(request.system_instruction.is_some());
    }

    #[tokio::test]
    async fn chat_parses_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "The answer.\n"}]}
                }]
            })))
            .mount(&server)
            .await;

        let p = provider(server.uri(), None);
        let answer = p.chat(&[Message::user("question")]).await.unwrap();
        assert_eq!(answer, "The answer.");
    }

    #[tokio::test]
    async fn chat_error_status_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let p = provider(server.uri(), None);
        let err = p.chat(&[Message::user("question")]).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("quota"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_empty_candidates_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let p = provider(server.uri(), None);
        let err = p.chat(&[Message::user("question")]).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { provider: "gemini" }));
    }

    #[tokio::test]
    async fn embed_parses_values() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:embedContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": {"values": [0.1, 0.2, 0.3]}
            })))
            .mount(&server)
            .await;

        let p = provider(server.uri(), Some("text-embedding-004".into()));
        let vector = p.embed("some text").await.unwrap();
        assert_eq!(vector.len(), 3);
    }

    #[tokio::test]
    async fn embed_without_model_errors() {
        let p = provider(DEFAULT_BASE_URL.into(), None);
        let err = p.embed("text").await.unwrap_err();
        assert!(matches!(err, LlmError::EmbedUnsupported { .. }));
    }
}
