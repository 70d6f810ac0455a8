//! Todo Lists Domain Library
//!
//! Password-protected shared todo lists stored in a vector database. A list is
//! located by the semantic embedding of its name and unlocked by its password.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────┐
//! │  handlers (HTTP API) │     │   TodoSession    │  ← optimistic client
//! └──────────┬───────────┘     └────────┬─────────┘
//!            │                          │ TodoListClient
//! ┌──────────▼──────────────────────────▼─────────┐
//! │              TodoListRepository                │
//! └─────┬──────────────────┬──────────────────┬────┘
//!       │                  │                  │
//! ┌─────▼──────┐  ┌────────▼────────┐  ┌──────▼───────────┐
//! │VectorStore │  │EmbeddingProvider│  │CredentialHasher  │
//! │ Qdrant     │  │ OpenAI          │  │ Argon2id         │
//! │ InMemory   │  └─────────────────┘  └──────────────────┘
//! └────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todo_lists::{
//!     Argon2Hasher, Credentials, HasherConfig, OpenAIProvider, QdrantConfig,
//!     QdrantVectorStore, TodoListRepository,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = OpenAIProvider::from_env()?;
//! let store = QdrantVectorStore::new(QdrantConfig::from_env()?)?;
//! store.ensure_collection(1536).await?;
//!
//! let repository = TodoListRepository::new(
//!     store,
//!     Arc::new(embedder),
//!     Arc::new(Argon2Hasher::new(HasherConfig::default())?),
//! );
//!
//! let credentials = Credentials::new("Monday todos", "secret");
//! let id = repository.create_todo_list(&credentials).await?;
//! assert_eq!(repository.find_todo_list(&credentials).await?, id);
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod handlers;
pub mod hasher;
pub mod ids;
pub mod models;
pub mod repository;
pub mod session;
pub mod store;

pub use embedding::{EmbeddingProvider, OpenAIConfig, OpenAIProvider};
pub use error::{TodoListError, TodoListResult};
pub use handlers::ApiDoc;
pub use hasher::{Argon2Hasher, CredentialHasher, HasherConfig};
pub use models::{
    Credentials, NameExists, NameQuery, TodoItem, TodoListId, TodoListMetadata, TodoListView,
    UpdateTodoItems,
};
pub use repository::{RepositoryConfig, TodoListRepository};
pub use session::{TodoListClient, TodoSession};
pub use store::{
    InMemoryVectorStore, QdrantConfig, QdrantVectorStore, ScoredRecord, VectorRecord, VectorStore,
};
