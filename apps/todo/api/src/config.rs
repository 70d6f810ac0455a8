use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use domain_todo_lists::{HasherConfig, OpenAIConfig, QdrantConfig, RepositoryConfig};
use std::str::FromStr;

pub use core_config::Environment;

/// Where todo lists are stored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorBackend {
    Qdrant,
    /// Process-local store, lost on restart
    Memory,
}

impl FromStr for VectorBackend {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qdrant" => Ok(Self::Qdrant),
            "memory" => Ok(Self::Memory),
            other => Err(eyre::eyre!(
                "Unknown VECTOR_BACKEND '{}', expected 'qdrant' or 'memory'",
                other
            )),
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from `core_config` and the todo lists domain
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: VectorBackend,
    pub qdrant: QdrantConfig,
    pub openai: OpenAIConfig,
    pub repository: RepositoryConfig,
    pub hasher: HasherConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=3000 unless set
        let backend = env_or_default("VECTOR_BACKEND", "qdrant").parse()?;
        let openai = OpenAIConfig::from_env()?; // OPENAI_API_KEY is required

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            backend,
            qdrant: QdrantConfig::from_env()?,
            openai,
            repository: RepositoryConfig::from_env()?,
            hasher: HasherConfig::from_env()?,
        })
    }
}
