use axum::{extract::State, response::Response};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_todo_lists::VectorStore;
use std::sync::Arc;

/// 200 when the vector store answers, 503 otherwise
pub async fn ready_handler<S: VectorStore + 'static>(State(store): State<Arc<S>>) -> Response {
    let vector_store: HealthCheckFuture<'_> = Box::pin(async move {
        store.health_check().await.map_err(|e| e.to_string())
    });

    run_health_checks(vec![("vector_store", vector_store)]).await
}
