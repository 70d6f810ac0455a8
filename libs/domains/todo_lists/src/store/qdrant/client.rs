use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, Distance, GetPointsBuilder, PointId, PointStruct,
    SearchPointsBuilder, UpdateStatus, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder, value::Kind,
};
use serde_json::Value;
use tracing::{debug, info};

use super::QdrantConfig;
use crate::error::{TodoListError, TodoListResult};
use crate::ids::{format_hex_id, parse_hex_id};
use crate::store::{ScoredRecord, VectorRecord, VectorStore};

/// Qdrant-backed [`VectorStore`] over a single cosine collection.
///
/// List ids are 16 hex chars and map one-to-one onto numeric point ids.
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorStore {
    pub fn new(config: QdrantConfig) -> TodoListResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| TodoListError::Store(format!("Failed to build client: {}", e)))?;

        Ok(Self::from_client(client, config.collection))
    }

    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    /// Create the collection with `dimension`-sized cosine vectors if missing.
    pub async fn ensure_collection(&self, dimension: u64) -> TodoListResult<()> {
        if self.client.collection_exists(&self.collection).await? {
            debug!(collection = %self.collection, "Collection already exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await?;

        info!(collection = %self.collection, dimension, "Created collection");
        Ok(())
    }

    fn point_id_to_string(point_id: Option<&PointId>) -> TodoListResult<String> {
        match point_id.and_then(|p| p.point_id_options.as_ref()) {
            Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(format_hex_id(*num)),
            Some(qdrant::point_id::PointIdOptions::Uuid(uuid)) => Ok(uuid.clone()),
            None => Err(TodoListError::Store("Missing point ID".to_string())),
        }
    }

    #[allow(deprecated)]
    fn extract_vector_from_output(vectors: &Option<qdrant::VectorsOutput>) -> Option<Vec<f32>> {
        match vectors {
            Some(qdrant::VectorsOutput {
                vectors_options: Some(opts),
            }) => match opts {
                qdrant::vectors_output::VectorsOptions::Vector(v) => Some(v.data.clone()),
                qdrant::vectors_output::VectorsOptions::Vectors(map) => {
                    map.vectors.values().next().map(|v| v.data.clone())
                }
            },
            _ => None,
        }
    }
}

fn payload_to_qdrant(metadata: Value) -> HashMap<String, QdrantValue> {
    match metadata {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, val)| (key, json_to_qdrant_value(val)))
            .collect(),
        _ => HashMap::new(),
    }
}

fn qdrant_to_payload(payload: HashMap<String, QdrantValue>) -> Option<Value> {
    if payload.is_empty() {
        return None;
    }

    Some(Value::Object(
        payload
            .into_iter()
            .map(|(key, val)| (key, qdrant_value_to_json(val)))
            .collect(),
    ))
}

fn json_to_qdrant_value(val: Value) -> QdrantValue {
    let kind = match val {
        Value::Null => Kind::NullValue(0),
        Value::Bool(b) => Kind::BoolValue(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => Kind::StringValue(s),
        Value::Array(values) => Kind::ListValue(qdrant::ListValue {
            values: values.into_iter().map(json_to_qdrant_value).collect(),
        }),
        Value::Object(map) => Kind::StructValue(qdrant::Struct {
            fields: map
                .into_iter()
                .map(|(key, val)| (key, json_to_qdrant_value(val)))
                .collect(),
        }),
    };

    QdrantValue { kind: Some(kind) }
}

fn qdrant_value_to_json(val: QdrantValue) -> Value {
    match val.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(f)) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(qdrant_value_to_json).collect())
        }
        Some(Kind::StructValue(st)) => Value::Object(
            st.fields
                .into_iter()
                .map(|(key, val)| (key, qdrant_value_to_json(val)))
                .collect(),
        ),
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: Value) -> TodoListResult<bool> {
        let point_id = parse_hex_id(id)
            .ok_or_else(|| TodoListError::Validation(format!("Invalid todo list id: {}", id)))?;

        let point = PointStruct::new(point_id, vector, payload_to_qdrant(metadata));

        let response = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await?;

        Ok(response
            .result
            .is_some_and(|r| r.status == UpdateStatus::Completed as i32))
    }

    async fn fetch(&self, id: &str, include_vector: bool) -> TodoListResult<Option<VectorRecord>> {
        let Some(point_id) = parse_hex_id(id) else {
            return Ok(None);
        };

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(&self.collection, vec![PointId::from(point_id)])
                    .with_vectors(include_vector)
                    .with_payload(true),
            )
            .await?;

        response
            .result
            .into_iter()
            .next()
            .map(|point| {
                Ok(VectorRecord {
                    id: Self::point_id_to_string(point.id.as_ref())?,
                    vector: Self::extract_vector_from_output(&point.vectors),
                    metadata: qdrant_to_payload(point.payload),
                })
            })
            .transpose()
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> TodoListResult<Vec<ScoredRecord>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, top_k)
                    .with_payload(include_metadata)
                    .with_vectors(false),
            )
            .await?;

        response
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredRecord {
                    id: Self::point_id_to_string(point.id.as_ref())?,
                    score: point.score,
                    metadata: qdrant_to_payload(point.payload),
                })
            })
            .collect()
    }

    async fn health_check(&self) -> TodoListResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
