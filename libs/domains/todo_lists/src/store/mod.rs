//! Vector store abstraction: one collection of `(id, vector, metadata)` entries
//! searched by cosine similarity.

mod memory;
pub mod qdrant;

pub use memory::InMemoryVectorStore;
pub use qdrant::{QdrantConfig, QdrantVectorStore};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TodoListResult;

/// An entry read back by id
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    /// Present only when requested
    pub vector: Option<Vec<f32>>,
    pub metadata: Option<Value>,
}

/// A nearest-neighbour query hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub id: String,
    pub score: f32,
    pub metadata: Option<Value>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace the entry for `id`.
    ///
    /// Returns `true` only once the store has acknowledged the write.
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> TodoListResult<bool>;

    /// `Ok(None)` when no entry exists for `id`.
    async fn fetch(&self, id: &str, include_vector: bool) -> TodoListResult<Option<VectorRecord>>;

    /// Up to `top_k` entries ordered best match first.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> TodoListResult<Vec<ScoredRecord>>;

    async fn health_check(&self) -> TodoListResult<()>;
}
