use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    Gemini,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub store: StoreConfig,
    pub retrieval: RetrievalSettings,
    pub index: IndexSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Provider endpoint. When unset, each provider falls back to its own
    /// default (local Ollama port, public Gemini endpoint).
    pub base_url: Option<String>,
    pub model: String,
    pub embedding_model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub snapshot_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub score_threshold: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub max_file_bytes: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            base_url: None,
            model: "llama3.2".into(),
            embedding_model: "nomic-embed-text".into(),
            api_key: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "./data/askrepo_index.json".into(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: 0.0,
        }
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: 1_048_576,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ASKREPO_LLM_PROVIDER") {
            match v.to_lowercase().as_str() {
                "ollama" => self.llm.provider = ProviderKind::Ollama,
                "gemini" => self.llm.provider = ProviderKind::Gemini,
                other => tracing::warn!("unknown provider override ignored: {other}"),
            }
        }
        if let Ok(v) = std::env::var("ASKREPO_LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("ASKREPO_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("ASKREPO_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("ASKREPO_SNAPSHOT_PATH") {
            self.store.snapshot_path = v;
        }
        if let Ok(v) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = Some(v);
        }
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error on a zero `top_k` or a Gemini provider without an
    /// API key.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.retrieval.top_k > 0, "retrieval.top_k must be at least 1");
        if self.llm.provider == ProviderKind::Gemini {
            anyhow::ensure!(
                self.llm.api_key.is_some(),
                "gemini provider requires llm.api_key (or GEMINI_API_KEY)"
            );
        }
        Ok(())
    }
}
