use axum::Router;
use domain_todo_lists::{TodoListRepository, VectorStore, handlers};
use std::sync::Arc;

pub mod health;

/// Domain routes, nested under `/api` by `create_router`
pub fn routes<S: VectorStore + 'static>(repository: TodoListRepository<S>) -> Router {
    Router::new().nest("/todo-lists", handlers::router(repository))
}

/// Readiness endpoint backed by the vector store
pub fn ready_router<S: VectorStore + 'static>(store: Arc<S>) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler::<S>))
        .with_state(store)
}
