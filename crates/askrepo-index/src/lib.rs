//! Repository indexing and retrieval.
//!
//! The pipeline: walk a repository tree, split each supported file into
//! text chunks by file kind, embed every chunk, and store vectors with
//! `{text, file, chunk_number}` payloads. At question time the query is
//! embedded and the nearest chunks come back for prompt assembly.

pub mod chunker;
pub mod error;
pub mod files;
pub mod indexer;
pub mod retriever;

pub use error::{IndexError, Result};
