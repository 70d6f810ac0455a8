use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::TodoListResult;
use crate::store::{ScoredRecord, VectorRecord, VectorStore};

#[derive(Debug, Clone)]
struct StoredEntry {
    /// Insertion order, kept across replacements; breaks score ties.
    seq: u64,
    vector: Vec<f32>,
    metadata: Value,
}

#[derive(Debug, Default)]
struct Entries {
    next_seq: u64,
    by_id: HashMap<String, StoredEntry>,
}

/// In-memory [`VectorStore`] using exact cosine similarity.
///
/// Every write is acknowledged. Equal scores rank in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> TodoListResult<bool> {
        let mut entries = self.entries.write().await;

        let seq = match entries.by_id.get(id) {
            Some(existing) => existing.seq,
            None => {
                entries.next_seq += 1;
                entries.next_seq
            }
        };

        entries.by_id.insert(
            id.to_string(),
            StoredEntry {
                seq,
                vector,
                metadata,
            },
        );

        Ok(true)
    }

    async fn fetch(&self, id: &str, include_vector: bool) -> TodoListResult<Option<VectorRecord>> {
        let entries = self.entries.read().await;

        Ok(entries.by_id.get(id).map(|entry| VectorRecord {
            id: id.to_string(),
            vector: include_vector.then(|| entry.vector.clone()),
            metadata: Some(entry.metadata.clone()),
        }))
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> TodoListResult<Vec<ScoredRecord>> {
        let entries = self.entries.read().await;

        let mut scored: Vec<(u64, ScoredRecord)> = entries
            .by_id
            .iter()
            .map(|(id, entry)| {
                (
                    entry.seq,
                    ScoredRecord {
                        id: id.clone(),
                        score: cosine_similarity(&vector, &entry.vector),
                        metadata: include_metadata.then(|| entry.metadata.clone()),
                    },
                )
            })
            .collect();

        scored.sort_by(|(seq_a, a), (seq_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(seq_a.cmp(seq_b))
        });

        Ok(scored
            .into_iter()
            .take(usize::try_from(top_k).unwrap_or(usize::MAX))
            .map(|(_, record)| record)
            .collect())
    }

    async fn health_check(&self) -> TodoListResult<()> {
        Ok(())
    }
}
