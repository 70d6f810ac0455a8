//! Repository behaviour against the in-memory store
//!
//! Uses a deterministic trigram embedder so that similarity ranking is
//! reproducible without calling an embedding API.

mod common;

use async_trait::async_trait;
use common::{EmptyEmbedder, FlakyStore, cheap_hasher, repository, repository_allowing_duplicates, repository_over};
use domain_todo_lists::*;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Barrier, Semaphore};

fn item(id: &str, name: &str, completed: bool) -> TodoItem {
    TodoItem {
        id: id.to_string(),
        name: name.to_string(),
        completed,
    }
}

#[tokio::test]
async fn test_monday_todos_scenario() {
    let repo = repository();
    let credentials = Credentials::new("Monday todos", "secret1");

    let id = repo.create_todo_list(&credentials).await.unwrap();
    assert_eq!(id.len(), 16);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(repo.find_todo_list(&credentials).await.unwrap(), id);

    let wrong = Credentials::new("Monday todos", "wrong");
    assert!(matches!(
        repo.find_todo_list(&wrong).await,
        Err(TodoListError::NotFound(_))
    ));

    let items = vec![item("a", "Buy milk", false)];
    repo.update_todo_items(&id, items.clone()).await.unwrap();

    let view = repo.get_todo_list(&id).await.unwrap();
    assert_eq!(
        view,
        TodoListView {
            name: "Monday todos".to_string(),
            items,
        }
    );
}

#[tokio::test]
async fn test_new_list_is_empty() {
    let repo = repository();
    for name in ["Chores", "Groceries for the week", "abc"] {
        let id = repo
            .create_todo_list(&Credentials::new(name, "secret"))
            .await
            .unwrap();
        let view = repo.get_todo_list(&id).await.unwrap();
        assert_eq!(view.name, name);
        assert!(view.items.is_empty());
    }
}

#[tokio::test]
async fn test_find_unknown_name_is_not_found() {
    let repo = repository();
    repo.create_todo_list(&Credentials::new("Chores", "secret"))
        .await
        .unwrap();

    let result = repo
        .find_todo_list(&Credentials::new("Holiday packing", "secret"))
        .await;
    assert!(matches!(result, Err(TodoListError::NotFound(_))));
}

#[tokio::test]
async fn test_find_in_empty_store_is_not_found() {
    let result = repository()
        .find_todo_list(&Credentials::new("Chores", "secret"))
        .await;
    assert!(matches!(result, Err(TodoListError::NotFound(_))));
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let repo = repository();
    let id = repo
        .create_todo_list(&Credentials::new("Chores", "secret"))
        .await
        .unwrap();
    repo.update_todo_items(&id, vec![item("a", "Sweep", true)])
        .await
        .unwrap();

    let first = repo.get_todo_list(&id).await.unwrap();
    let second = repo.get_todo_list(&id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_replaces_wholesale_preserving_order() {
    let repo = repository();
    let id = repo
        .create_todo_list(&Credentials::new("Chores", "secret"))
        .await
        .unwrap();

    repo.update_todo_items(
        &id,
        vec![item("a", "Sweep", false), item("b", "Mop", false)],
    )
    .await
    .unwrap();

    let replacement = vec![
        item("c", "Dust", false),
        item("b", "Mop", true),
        item("d", "Vacuum", false),
    ];
    repo.update_todo_items(&id, replacement.clone()).await.unwrap();
    assert_eq!(repo.get_todo_list(&id).await.unwrap().items, replacement);

    repo.update_todo_items(&id, vec![]).await.unwrap();
    assert!(repo.get_todo_list(&id).await.unwrap().items.is_empty());
}

#[tokio::test]
async fn test_update_keeps_list_findable() {
    let repo = repository();
    let credentials = Credentials::new("Chores", "secret");
    let id = repo.create_todo_list(&credentials).await.unwrap();

    repo.update_todo_items(&id, vec![item("a", "Sweep", false)])
        .await
        .unwrap();

    assert_eq!(repo.find_todo_list(&credentials).await.unwrap(), id);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let repo = repository();
    assert!(matches!(
        repo.get_todo_list("00000000000000ff").await,
        Err(TodoListError::NotFound(_))
    ));
    assert!(matches!(
        repo.update_todo_items("00000000000000ff", vec![]).await,
        Err(TodoListError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let store = InMemoryVectorStore::new();
    let repo = repository_over(store.clone(), RepositoryConfig::default());
    let id = repo
        .create_todo_list(&Credentials::new("Chores", "secret"))
        .await
        .unwrap();

    let record = store.fetch(&id, false).await.unwrap().unwrap();
    let metadata = record.metadata.unwrap();
    let hash = metadata["passwordHash"].as_str().unwrap();
    assert_ne!(hash, "secret");
    assert!(hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_duplicate_name_rejected_by_default() {
    let repo = repository();
    repo.create_todo_list(&Credentials::new("Monday todos", "secret1"))
        .await
        .unwrap();

    let result = repo
        .create_todo_list(&Credentials::new("Monday todos", "secret2"))
        .await;
    assert!(matches!(result, Err(TodoListError::Duplicate(_))));

    // Near-identical names are distinct lists.
    assert!(
        repo.create_todo_list(&Credentials::new("Monday todo", "secret2"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_password_selects_between_same_named_lists() {
    let repo = repository_allowing_duplicates(5);
    let first = repo
        .create_todo_list(&Credentials::new("Shared", "alpha"))
        .await
        .unwrap();
    let second = repo
        .create_todo_list(&Credentials::new("Shared", "bravo"))
        .await
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(
        repo.find_todo_list(&Credentials::new("Shared", "alpha"))
            .await
            .unwrap(),
        first
    );
    assert_eq!(
        repo.find_todo_list(&Credentials::new("Shared", "bravo"))
            .await
            .unwrap(),
        second
    );
}

#[tokio::test]
async fn test_name_exists() {
    let repo = repository();
    assert!(!repo.todo_list_name_exists("Monday todos").await.unwrap());

    repo.create_todo_list(&Credentials::new("Monday todos", "secret"))
        .await
        .unwrap();

    assert!(repo.todo_list_name_exists("Monday todos").await.unwrap());
    assert!(!repo.todo_list_name_exists("Monday todo").await.unwrap());
    assert!(!repo.todo_list_name_exists("Tuesday todos").await.unwrap());
}

#[tokio::test]
async fn test_near_identical_names_do_not_hide_exact_match() {
    let repo = repository();
    for n in 1..=6 {
        repo.create_todo_list(&Credentials::new(format!("Monday todos {}", n), "secret"))
            .await
            .unwrap();
    }
    let id = repo
        .create_todo_list(&Credentials::new("Monday todos", "secret"))
        .await
        .unwrap();

    // The exact name embeds identically and ranks first among its neighbours.
    assert_eq!(
        repo.find_todo_list(&Credentials::new("Monday todos", "secret"))
            .await
            .unwrap(),
        id
    );
    assert_eq!(
        repo.find_todo_list(&Credentials::new("Monday todos 4", "wrong"))
            .await
            .ok(),
        None
    );
}

#[tokio::test]
async fn test_top_k_boundary_with_six_identical_names() {
    let store = InMemoryVectorStore::new();
    let repo = repository_over(
        store.clone(),
        RepositoryConfig {
            top_k: 5,
            reject_duplicate_names: false,
        },
    );

    let mut ids = Vec::new();
    for n in 1..=6 {
        let id = repo
            .create_todo_list(&Credentials::new("Monday todos", format!("secret{}", n)))
            .await
            .unwrap();
        ids.push(id);
    }

    // The five best-ranked candidates are still reachable.
    for n in 1..=5 {
        assert_eq!(
            repo.find_todo_list(&Credentials::new("Monday todos", format!("secret{}", n)))
                .await
                .unwrap(),
            ids[n - 1]
        );
    }

    // The sixth falls outside the candidate window and is reported missing.
    let sixth = Credentials::new("Monday todos", "secret6");
    assert!(matches!(
        repo.find_todo_list(&sixth).await,
        Err(TodoListError::NotFound(_))
    ));

    // Widening the window makes it reachable again.
    let wider = repository_over(
        store,
        RepositoryConfig {
            top_k: 6,
            reject_duplicate_names: false,
        },
    );
    assert_eq!(wider.find_todo_list(&sixth).await.unwrap(), ids[5]);
}

#[tokio::test]
async fn test_invalid_credentials_rejected() {
    let repo = repository();
    for credentials in [
        Credentials::new("ab", "secret"),
        Credentials::new("Chores", "ab"),
        Credentials::new("x".repeat(51), "secret"),
        Credentials::new("Chores", "x".repeat(51)),
    ] {
        assert!(matches!(
            repo.create_todo_list(&credentials).await,
            Err(TodoListError::Validation(_))
        ));
        assert!(matches!(
            repo.find_todo_list(&credentials).await,
            Err(TodoListError::Validation(_))
        ));
    }
}

#[tokio::test]
async fn test_empty_embedding_fails_without_side_effects() {
    let store = InMemoryVectorStore::new();
    let repo = TodoListRepository::new(store.clone(), Arc::new(EmptyEmbedder), cheap_hasher());

    let result = repo
        .create_todo_list(&Credentials::new("Chores", "secret"))
        .await;

    assert!(matches!(result, Err(TodoListError::Embedding(_))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unacknowledged_writes_are_errors() {
    let store = FlakyStore::default();
    let repo = repository_over(store.clone(), RepositoryConfig::default());
    let id = repo
        .create_todo_list(&Credentials::new("Chores", "secret"))
        .await
        .unwrap();

    store.set_drop_writes(true);

    assert!(matches!(
        repo.create_todo_list(&Credentials::new("Groceries", "secret"))
            .await,
        Err(TodoListError::StoreWrite(_))
    ));
    assert!(matches!(
        repo.update_todo_items(&id, vec![item("a", "Sweep", false)])
            .await,
        Err(TodoListError::StoreWrite(_))
    ));
    assert!(repo.get_todo_list(&id).await.unwrap().items.is_empty());
}

/// Store that lets both writers read before either writes, and holds the
/// second writer back until the first has landed.
struct InterleavingStore {
    inner: InMemoryVectorStore,
    both_fetched: Barrier,
    first_written: Semaphore,
}

#[async_trait]
impl VectorStore for InterleavingStore {
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> TodoListResult<bool> {
        let from_b = metadata["items"][0]["id"] == "b";
        if from_b {
            let _permit = self.first_written.acquire().await.unwrap();
            return self.inner.upsert(id, vector, metadata).await;
        }
        let written = self.inner.upsert(id, vector, metadata).await;
        self.first_written.add_permits(1);
        written
    }

    async fn fetch(&self, id: &str, include_vector: bool) -> TodoListResult<Option<VectorRecord>> {
        let record = self.inner.fetch(id, include_vector).await;
        if include_vector {
            self.both_fetched.wait().await;
        }
        record
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
        Ok(())
    }
}

#[tokio::test]
async fn test_interleaved_updates_last_write_wins() {
    let inner = InMemoryVectorStore::new();
    let id = repository_over(inner.clone(), RepositoryConfig::default())
        .create_todo_list(&Credentials::new("Chores", "secret"))
        .await
        .unwrap();

    let repo = repository_over(
        InterleavingStore {
            inner: inner.clone(),
            both_fetched: Barrier::new(2),
            first_written: Semaphore::new(0),
        },
        RepositoryConfig::default(),
    );

    let writes_a = vec![item("a", "Sweep", false), item("a2", "Dust", false)];
    let writes_b = vec![item("b", "Mop", true)];

    let (a, b) = tokio::join!(
        repo.update_todo_items(&id, writes_a),
        repo.update_todo_items(&id, writes_b.clone()),
    );
    a.unwrap();
    b.unwrap();

    // B read before A wrote, so B's sequence replaces A's outright.
    let view = repository_over(inner, RepositoryConfig::default())
        .get_todo_list(&id)
        .await
        .unwrap();
    assert_eq!(view.items, writes_b);
}
