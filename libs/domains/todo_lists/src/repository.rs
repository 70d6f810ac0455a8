use std::sync::Arc;

use async_trait::async_trait;
use core_config::{env_flag, env_parse_or};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::embedding::EmbeddingProvider;
use crate::error::{TodoListError, TodoListResult};
use crate::hasher::CredentialHasher;
use crate::ids::random_hex_id;
use crate::models::{
    Credentials, NameQuery, TodoItem, TodoListMetadata, TodoListView, validate_items,
};
use crate::session::TodoListClient;
use crate::store::VectorStore;

/// Tuning for name lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Number of nearest neighbours inspected when matching a name
    pub top_k: u64,
    /// Refuse to create a list whose name is already among the candidates
    pub reject_duplicate_names: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            reject_duplicate_names: true,
        }
    }
}

impl RepositoryConfig {
    pub fn from_env() -> TodoListResult<Self> {
        let defaults = Self::default();
        let top_k = env_parse_or("TODO_LISTS_TOP_K", defaults.top_k)?;
        if top_k == 0 {
            return Err(TodoListError::Config(
                "TODO_LISTS_TOP_K must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            top_k,
            reject_duplicate_names: env_flag(
                "TODO_LISTS_REJECT_DUPLICATES",
                defaults.reject_duplicate_names,
            )?,
        })
    }
}

/// Todo lists persisted as vector store entries.
///
/// Each list is one entry: the embedding of its name plus metadata holding the
/// name, the items and the password hash. Lists are located by embedding the
/// requested name, inspecting the `top_k` nearest entries and keeping those
/// whose stored name is exactly equal. Names are not unique, so the password
/// picks between candidates.
pub struct TodoListRepository<S: VectorStore> {
    store: Arc<S>,
    embedder: Arc<dyn EmbeddingProvider>,
    hasher: Arc<dyn CredentialHasher>,
    config: RepositoryConfig,
}

impl<S: VectorStore> Clone for TodoListRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            embedder: Arc::clone(&self.embedder),
            hasher: Arc::clone(&self.hasher),
            config: self.config.clone(),
        }
    }
}

impl<S: VectorStore + 'static> TodoListRepository<S> {
    pub fn new(
        store: S,
        embedder: Arc<dyn EmbeddingProvider>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            embedder,
            hasher,
            config: RepositoryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Shared handle to the underlying store, e.g. for readiness probes
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Create an empty list and return its new id.
    #[instrument(skip_all, fields(name = %credentials.name))]
    pub async fn create_todo_list(&self, credentials: &Credentials) -> TodoListResult<String> {
        credentials.validate()?;

        let embedding = self.embed_name(&credentials.name).await?;

        if self.config.reject_duplicate_names
            && self.name_in_candidates(&embedding, &credentials.name).await?
        {
            return Err(TodoListError::Duplicate(credentials.name.clone()));
        }

        let metadata = TodoListMetadata {
            name: credentials.name.clone(),
            items: Vec::new(),
            password_hash: self.hash_password(&credentials.password).await?,
        };

        let id = random_hex_id();
        let acknowledged = self
            .store
            .upsert(&id, embedding, metadata.to_value()?)
            .await?;

        if !acknowledged {
            return Err(TodoListError::StoreWrite(
                "write was not acknowledged".to_string(),
            ));
        }

        info!(list_id = %id, "Created todo list");
        Ok(id)
    }

    /// Id of the list whose name and password both match.
    ///
    /// Only the `top_k` nearest entries are inspected; a matching list ranked
    /// below them is reported as not found.
    #[instrument(skip_all, fields(name = %credentials.name))]
    pub async fn find_todo_list(&self, credentials: &Credentials) -> TodoListResult<String> {
        credentials.validate()?;

        let embedding = self.embed_name(&credentials.name).await?;

        for (id, metadata) in self.candidates(embedding).await? {
            if metadata.name != credentials.name {
                continue;
            }
            if self
                .password_matches(&credentials.password, &metadata.password_hash, &id)
                .await?
            {
                debug!(list_id = %id, "Found todo list");
                return Ok(id);
            }
        }

        Err(TodoListError::list_not_found())
    }

    /// Whether a list named exactly `name` is among the nearest entries
    #[instrument(skip(self))]
    pub async fn todo_list_name_exists(&self, name: &str) -> TodoListResult<bool> {
        NameQuery {
            name: name.to_string(),
        }
        .validate()?;

        let embedding = self.embed_name(name).await?;
        self.name_in_candidates(&embedding, name).await
    }

    #[instrument(skip(self))]
    pub async fn get_todo_list(&self, list_id: &str) -> TodoListResult<TodoListView> {
        let record = self
            .store
            .fetch(list_id, false)
            .await?
            .ok_or_else(TodoListError::list_not_found)?;

        let metadata = record.metadata.ok_or_else(TodoListError::list_not_found)?;
        Ok(TodoListMetadata::from_value(metadata)?.into())
    }

    /// Replace the list's items wholesale.
    ///
    /// Read-modify-write without a version check: concurrent writers race and
    /// the last acknowledged write wins.
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn update_todo_items(
        &self,
        list_id: &str,
        items: Vec<TodoItem>,
    ) -> TodoListResult<()> {
        validate_items(&items)?;

        let record = self
            .store
            .fetch(list_id, true)
            .await?
            .ok_or_else(TodoListError::list_not_found)?;

        let vector = record
            .vector
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TodoListError::NotFound("Todo list vector not found".to_string()))?;
        let metadata = record.metadata.ok_or_else(TodoListError::list_not_found)?;

        let mut metadata = TodoListMetadata::from_value(metadata)?;
        metadata.items = items;

        let acknowledged = self
            .store
            .upsert(list_id, vector, metadata.to_value()?)
            .await?;

        if !acknowledged {
            return Err(TodoListError::StoreWrite(
                "write was not acknowledged".to_string(),
            ));
        }

        debug!("Updated todo items");
        Ok(())
    }

    async fn embed_name(&self, name: &str) -> TodoListResult<Vec<f32>> {
        let embedding = self.embedder.embed(name).await?;
        if embedding.is_empty() {
            return Err(TodoListError::Embedding(
                "Failed to create embedding for the name".to_string(),
            ));
        }
        Ok(embedding)
    }

    /// Nearest entries with decodable metadata, best first
    async fn candidates(
        &self,
        embedding: Vec<f32>,
    ) -> TodoListResult<Vec<(String, TodoListMetadata)>> {
        let hits = self.store.query(embedding, self.config.top_k, true).await?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let metadata = hit.metadata?;
                match TodoListMetadata::from_value(metadata) {
                    Ok(metadata) => Some((hit.id, metadata)),
                    Err(e) => {
                        warn!(list_id = %hit.id, error = %e, "Skipping entry with unreadable metadata");
                        None
                    }
                }
            })
            .collect())
    }

    async fn name_in_candidates(&self, embedding: &[f32], name: &str) -> TodoListResult<bool> {
        Ok(self
            .candidates(embedding.to_vec())
            .await?
            .iter()
            .any(|(_, metadata)| metadata.name == name))
    }

    async fn hash_password(&self, password: &str) -> TodoListResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| TodoListError::Internal(format!("Hashing task failed: {}", e)))?
    }

    async fn password_matches(
        &self,
        password: &str,
        password_hash: &str,
        list_id: &str,
    ) -> TodoListResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let password_hash = password_hash.to_string();

        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| TodoListError::Internal(format!("Hashing task failed: {}", e)))?;

        match verified {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!(list_id = %list_id, error = %e, "Stored password hash is unreadable");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl<S: VectorStore + 'static> TodoListClient for TodoListRepository<S> {
    async fn get_todo_list(&self, list_id: &str) -> TodoListResult<TodoListView> {
        TodoListRepository::get_todo_list(self, list_id).await
    }

    async fn update_todo_items(&self, list_id: &str, items: Vec<TodoItem>) -> TodoListResult<()> {
        TodoListRepository::update_todo_items(self, list_id, items).await
    }
}
