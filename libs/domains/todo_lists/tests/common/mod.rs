//! Shared fixtures for the todo list integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use domain_todo_lists::{
    Argon2Hasher, EmbeddingProvider, HasherConfig, InMemoryVectorStore, RepositoryConfig,
    ScoredRecord, TodoListRepository, TodoListResult, VectorRecord, VectorStore,
};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const DIMENSION: usize = 64;

/// Deterministic embedder: hashed character trigrams, so equal names embed
/// identically and names sharing most characters land close together.
pub struct TrigramEmbedder;

#[async_trait]
impl EmbeddingProvider for TrigramEmbedder {
    fn dimension(&self) -> u64 {
        DIMENSION as u64
    }

    async fn embed(&self, text: &str) -> TodoListResult<Vec<f32>> {
        let padded: Vec<char> = format!("  {}  ", text.to_lowercase()).chars().collect();
        let mut vector = vec![0.0f32; DIMENSION];

        for window in padded.windows(3) {
            let mut hasher = DefaultHasher::new();
            window.hash(&mut hasher);
            vector[(hasher.finish() % DIMENSION as u64) as usize] += 1.0;
        }

        Ok(vector)
    }
}

/// Embedder that always answers without data
pub struct EmptyEmbedder;

#[async_trait]
impl EmbeddingProvider for EmptyEmbedder {
    fn dimension(&self) -> u64 {
        DIMENSION as u64
    }

    async fn embed(&self, _text: &str) -> TodoListResult<Vec<f32>> {
        Ok(Vec::new())
    }
}

/// In-memory store whose writes can be switched to unacknowledged.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryVectorStore,
    drop_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn set_drop_writes(&self, drop_writes: bool) {
        self.drop_writes.store(drop_writes, Ordering::SeqCst);
    }
}

#[async_trait]
impl VectorStore for FlakyStore {
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> TodoListResult<bool> {
        if self.drop_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.upsert(id, vector, metadata).await
    }

    async fn fetch(&self, id: &str, include_vector: bool) -> TodoListResult<Option<VectorRecord>> {
        self.inner.fetch(id, include_vector).await
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> TodoListResult<Vec<ScoredRecord>> {
        self.inner.query(vector, top_k, include_metadata).await
    }

    async fn health_check(&self) -> TodoListResult<()> {
        self.inner.health_check().await
    }
}

pub fn cheap_hasher() -> Arc<Argon2Hasher> {
    Arc::new(
        Argon2Hasher::new(HasherConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap(),
    )
}

pub fn repository_over<S: VectorStore + 'static>(
    store: S,
    config: RepositoryConfig,
) -> TodoListRepository<S> {
    TodoListRepository::new(store, Arc::new(TrigramEmbedder), cheap_hasher()).with_config(config)
}

pub fn repository() -> TodoListRepository<InMemoryVectorStore> {
    repository_over(InMemoryVectorStore::new(), RepositoryConfig::default())
}

pub fn repository_allowing_duplicates(top_k: u64) -> TodoListRepository<InMemoryVectorStore> {
    repository_over(
        InMemoryVectorStore::new(),
        RepositoryConfig {
            top_k,
            reject_duplicate_names: false,
        },
    )
}
