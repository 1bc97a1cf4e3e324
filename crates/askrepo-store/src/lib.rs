//! In-process vector storage for embedded chunks.
//!
//! A flat store: every search computes cosine similarity against all stored
//! vectors. Persistence is a whole-store JSON snapshot on disk.

pub mod error;
pub mod memory;
pub mod vector_store;

pub use error::StoreError;
pub use memory::MemoryVectorStore;
pub use vector_store::{ScoredPoint, VectorPoint, VectorStore};
