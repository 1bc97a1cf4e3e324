use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::vector_store::{ScoredPoint, VectorPoint, VectorStore};

struct StoredPoint {
    vector: Vec<f32>,
    payload: HashMap<String, serde_json::Value>,
}

/// Flat in-memory vector store with exact cosine search.
pub struct MemoryVectorStore {
    points: RwLock<HashMap<String, StoredPoint>>,
}

/// On-disk snapshot format: the full point set as JSON.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    points: Vec<VectorPoint>,
}

impl MemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: RwLock::new(HashMap::new()),
        }
    }

    /// Load a store from a snapshot file written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        let points = snapshot
            .points
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    StoredPoint {
                        vector: p.vector,
                        payload: p.payload,
                    },
                )
            })
            .collect();

        Ok(Self {
            points: RwLock::new(points),
        })
    }

    /// Write the full store to a snapshot file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let points = self
            .points
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let snapshot = Snapshot {
            points: points
                .iter()
                .map(|(id, sp)| VectorPoint {
                    id: id.clone(),
                    vector: sp.vector.clone(),
                    payload: sp.payload.clone(),
                })
                .collect(),
        };
        drop(points);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(&snapshot)?)?;
        Ok(())
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryVectorStore").finish_non_exhaustive()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorStore for MemoryVectorStore {
    fn upsert(&self, points: Vec<VectorPoint>) -> Result<(), StoreError> {
        let mut stored = self
            .points
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        for p in points {
            stored.insert(
                p.id,
                StoredPoint {
                    vector: p.vector,
                    payload: p.payload,
                },
            );
        }
        Ok(())
    }

    fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>, StoreError> {
        let stored = self
            .points
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let mut scored: Vec<ScoredPoint> = stored
            .iter()
            .map(|(id, sp)| ScoredPoint {
                id: id.clone(),
                score: cosine_similarity(vector, &sp.vector),
                payload: sp.payload.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut stored = self
            .points
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        stored.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let stored = self
            .points
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(stored.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, vector: Vec<f32>, name: &str) -> VectorPoint {
        VectorPoint {
            id: id.into(),
            vector,
            payload: HashMap::from([("name".into(), serde_json::json!(name))]),
        }
    }

    #[test]
    fn upsert_and_search_ranks_by_similarity() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                point("a", vec![1.0, 0.0, 0.0], "alpha"),
                point("b", vec![0.0, 1.0, 0.0], "beta"),
            ])
            .unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert!((results[0].score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn search_truncates_to_limit() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                point("a", vec![1.0, 0.0], "a"),
                point("b", vec![0.9, 0.1], "b"),
                point("c", vec![0.0, 1.0], "c"),
            ])
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn upsert_same_id_replaces() {
        let store = MemoryVectorStore::new();
        store.upsert(vec![point("a", vec![1.0, 0.0], "old")]).unwrap();
        store.upsert(vec![point("a", vec![0.0, 1.0], "new")]).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let results = store.search(&[0.0, 1.0], 1).unwrap();
        assert_eq!(results[0].payload.get("name").unwrap(), "new");
    }

    #[test]
    fn clear_empties_store() {
        let store = MemoryVectorStore::new();
        store.upsert(vec![point("a", vec![1.0], "a")]).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.search(&[1.0], 5).unwrap().is_empty());
    }

    #[test]
    fn search_empty_store_returns_empty() {
        let store = MemoryVectorStore::new();
        assert!(store.search(&[1.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("snapshot.json");

        let store = MemoryVectorStore::new();
        store
            .upsert(vec![point("a", vec![1.0, 0.0], "alpha")])
            .unwrap();
        store.save(&path).unwrap();

        let loaded = MemoryVectorStore::load(&path).unwrap();
        assert_eq!(loaded.len().unwrap(), 1);
        let results = loaded.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].id, "a");
        assert_eq!(results[0].payload.get("name").unwrap(), "alpha");
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = MemoryVectorStore::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn cosine_similarity_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn cosine_similarity_zero_norm() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).abs() < f32::EPSILON);
    }
}
