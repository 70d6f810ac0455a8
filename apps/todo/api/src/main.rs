use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_todo_lists::{
    Argon2Hasher, CredentialHasher, EmbeddingProvider, InMemoryVectorStore, OpenAIProvider,
    QdrantVectorStore, TodoListRepository, VectorStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::{Config, VectorBackend};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OpenAIProvider::new(config.openai.clone())?);
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new(config.hasher)?);

    match config.backend {
        VectorBackend::Qdrant => {
            info!(url = %config.qdrant.url, collection = %config.qdrant.collection, "Connecting to Qdrant");
            let store = QdrantVectorStore::new(config.qdrant.clone())?;
            store.ensure_collection(embedder.dimension()).await?;
            serve(config, TodoListRepository::new(store, embedder, hasher)).await
        }
        VectorBackend::Memory => {
            warn!("Using in-memory vector store, todo lists are lost on restart");
            let store = InMemoryVectorStore::new();
            serve(config, TodoListRepository::new(store, embedder, hasher)).await
        }
    }
}

async fn serve<S: VectorStore + 'static>(
    config: Config,
    repository: TodoListRepository<S>,
) -> eyre::Result<()> {
    let repository = repository.with_config(config.repository.clone());
    let store = repository.store();

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api::routes(repository))?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the vector store
    let app = router
        .merge(health_router(config.app))
        .merge(api::ready_router(store));

    info!(
        top_k = config.repository.top_k,
        reject_duplicate_names = config.repository.reject_duplicate_names,
        "Starting todo API with production-ready shutdown (30s timeout)"
    );

    create_production_app(app, &config.server, Duration::from_secs(30), async {
        info!("Shutting down: no open connections to drain");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Todo API shutdown complete");
    Ok(())
}
