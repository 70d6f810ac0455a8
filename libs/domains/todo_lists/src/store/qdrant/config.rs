use core_config::{env_or_default, env_parse_or};

use crate::error::TodoListResult;

const DEFAULT_URL: &str = "http://localhost:6334";
const DEFAULT_COLLECTION: &str = "todo-lists";

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn from_env() -> TodoListResult<Self> {
        Ok(Self {
            url: env_or_default("QDRANT_URL", DEFAULT_URL),
            api_key: std::env::var("QDRANT_API_KEY").ok().filter(|k| !k.is_empty()),
            collection: env_or_default("QDRANT_COLLECTION", DEFAULT_COLLECTION),
            timeout_secs: env_parse_or("QDRANT_TIMEOUT_SECS", 30)?,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: None,
            collection: DEFAULT_COLLECTION.to_string(),
            timeout_secs: 30,
        }
    }
}
