use async_trait::async_trait;

use crate::error::TodoListResult;

/// Turns a list name into a vector for similarity search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Length of the vectors this provider produces
    fn dimension(&self) -> u64;

    /// Embed a single text. May return an empty vector if the upstream
    /// answered without data; callers treat that as a failure.
    async fn embed(&self, text: &str) -> TodoListResult<Vec<f32>>;
}
