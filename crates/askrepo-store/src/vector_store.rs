use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A vector plus its document payload, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, serde_json::Value>,
}

/// A search hit with its cosine similarity score.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: HashMap<String, serde_json::Value>,
}

pub trait VectorStore: Send + Sync {
    /// Insert points, replacing any with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn upsert(&self, points: Vec<VectorPoint>) -> Result<(), StoreError>;

    /// Return up to `limit` points ranked by cosine similarity to `vector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, StoreError>;

    /// Remove every stored point.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear(&self) -> Result<(), StoreError>;

    /// Number of stored points.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn len(&self) -> Result<usize, StoreError>;

    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
