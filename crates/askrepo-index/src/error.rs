//! Error types for askrepo-index.

/// Errors that can occur during indexing and retrieval.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// IO error reading source files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Vector store error.
    #[error("store error: {0}")]
    Store(#[from] askrepo_store::StoreError),

    /// LLM provider error (embedding).
    #[error("LLM error: {0}")]
    Llm(#[from] askrepo_llm::LlmError),

    /// File has no supported extension.
    #[error("unsupported file type")]
    UnsupportedFile,

    /// Generic catch-all error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
