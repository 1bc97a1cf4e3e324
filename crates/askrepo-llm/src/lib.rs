//! LLM provider abstraction: chat completions and text embeddings over
//! a local Ollama server or the Gemini HTTP API.

pub mod any;
pub mod error;
pub mod gemini;
pub mod http;
pub mod mock;
pub mod ollama;
pub mod provider;

pub use error::{LlmError, Result};
