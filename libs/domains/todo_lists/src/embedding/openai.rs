use async_trait::async_trait;
use core_config::{env_or_default, env_parse_or, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::EmbeddingProvider;
use crate::error::{TodoListError, TodoListResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSION: u64 = 1536;

/// OpenAI embedding provider configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimension: u64,
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
            timeout_secs: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_env() -> TodoListResult<Self> {
        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_MODEL),
            dimension: env_parse_or("OPENAI_EMBEDDING_DIMENSION", DEFAULT_DIMENSION)?,
            timeout_secs: env_parse_or("OPENAI_TIMEOUT_SECS", 30)?,
        })
    }
}

/// OpenAI embeddings provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> TodoListResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TodoListError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> TodoListResult<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
    dimensions: u64,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn dimension(&self) -> u64 {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> TodoListResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: text,
            encoding_format: "float",
            dimensions: self.config.dimension,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TodoListError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let mut data = response.json::<EmbeddingResponse>().await?.data;
        data.sort_by_key(|d| d.index);

        let embedding = data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| TodoListError::Embedding("No embedding returned".to_string()))?;

        if embedding.len() as u64 != self.config.dimension {
            return Err(TodoListError::Embedding(format!(
                "Expected {} dimensions from {}, got {}",
                self.config.dimension,
                self.config.model,
                embedding.len()
            )));
        }

        debug!(dimension = embedding.len(), model = %self.config.model, "Created embedding");
        Ok(embedding)
    }
}
