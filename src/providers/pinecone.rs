//! Pinecone-style HTTP vector index provider
//!
//! Control-plane calls manage the index itself (describe/create); data-plane
//! calls run against the index host discovered at setup. Segment ids embed the
//! owning document id as a prefix, which is what delete-by-document filters on.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::config::VectorIndexConfig;
use crate::error::{Error, Result, Stage};
use crate::types::document::{Segment, SegmentMetadata};

use super::vector_index::{DistanceMetric, ScoredMatch, VectorIndexProvider, VectorRecord};

/// Delete requests are batched to stay under the API's per-call id limit
const DELETE_BATCH: usize = 1000;

/// Managed HTTP vector index client
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    control_url: String,
    index_name: String,
    cloud: String,
    region: String,
    /// Data-plane host, seeded from config or discovered by `ensure_index`
    host: RwLock<Option<String>>,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
    dimension: usize,
}

#[derive(Serialize)]
struct WireVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    score: f32,
    metadata: Option<Value>,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    vectors: Vec<ListedVector>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct ListedVector {
    id: String,
}

#[derive(Deserialize)]
struct Pagination {
    next: Option<String>,
}

impl PineconeIndex {
    /// Create a new index client from configuration.
    ///
    /// Fails with a configuration error when no API key is available.
    pub fn new(config: &VectorIndexConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("vector index api_key is not set (VECTOR_INDEX_API_KEY)"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            api_key,
            control_url: config.control_url.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            cloud: config.cloud.clone(),
            region: config.region.clone(),
            host: RwLock::new(config.index_host.clone()),
        })
    }

    fn data_url(&self, path: &str) -> Result<String> {
        let host = self.host.read().clone().ok_or_else(|| {
            Error::config("vector index host unknown; call ensure_index or set index_host")
        })?;
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(format!("{}{}", host.trim_end_matches('/'), path))
        } else {
            Ok(format!("https://{}{}", host, path))
        }
    }

    async fn describe_index(&self) -> Result<Option<IndexDescription>> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::upstream(Stage::VectorIndex, format!("describe failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Stage::VectorIndex,
                format!("describe failed: HTTP {} - {}", status, body),
            ));
        }

        let description = response.json().await.map_err(|e| {
            Error::upstream(Stage::VectorIndex, format!("failed to parse describe response: {}", e))
        })?;
        Ok(Some(description))
    }

    async fn create_index(
        &self,
        dimensions: usize,
        metric: DistanceMetric,
    ) -> Result<IndexDescription> {
        let url = format!("{}/indexes", self.control_url);
        let body = serde_json::json!({
            "name": self.index_name,
            "dimension": dimensions,
            "metric": metric.to_string(),
            "spec": {
                "serverless": {
                    "cloud": self.cloud,
                    "region": self.region,
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::upstream(Stage::VectorIndex, format!("create failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Stage::VectorIndex,
                format!("create failed: HTTP {} - {}", status, body),
            ));
        }

        response.json().await.map_err(|e| {
            Error::upstream(Stage::VectorIndex, format!("failed to parse create response: {}", e))
        })
    }

    /// Collect all segment ids stored under a document's id prefix
    async fn list_ids_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let url = self.data_url("/vectors/list")?;
            let mut request = self
                .client
                .get(&url)
                .header("Api-Key", &self.api_key)
                .query(&[("prefix", prefix), ("limit", "100")]);
            if let Some(ref t) = token {
                request = request.query(&[("paginationToken", t.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::upstream(Stage::VectorIndex, format!("list failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::upstream(
                    Stage::VectorIndex,
                    format!("list failed: HTTP {} - {}", status, body),
                ));
            }

            let page: ListResponse = response.json().await.map_err(|e| {
                Error::upstream(Stage::VectorIndex, format!("failed to parse list response: {}", e))
            })?;

            ids.extend(page.vectors.into_iter().map(|v| v.id));

            token = page.pagination.and_then(|p| p.next);
            if token.is_none() {
                break;
            }
        }

        Ok(ids)
    }

    /// Reconstruct segment metadata from the wire representation. Numeric
    /// metadata comes back as floats, so fields are parsed individually.
    fn parse_metadata(value: &Value) -> Option<SegmentMetadata> {
        let document_id = value
            .get("document_id")?
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())?;
        let ordinal = value.get("ordinal")?.as_f64()? as u32;
        let title = value
            .get("title")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string());
        let text = value.get("text")?.as_str()?.to_string();

        Some(SegmentMetadata {
            document_id,
            ordinal,
            title,
            text,
        })
    }
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn ensure_index(&self, dimensions: usize, metric: DistanceMetric) -> Result<()> {
        let description = match self.describe_index().await? {
            Some(description) => {
                if description.dimension != dimensions {
                    return Err(Error::config(format!(
                        "index '{}' has dimension {}, embedding provider produces {}",
                        self.index_name, description.dimension, dimensions
                    )));
                }
                description
            }
            None => {
                tracing::info!(
                    "Creating index '{}' ({} dims, {})",
                    self.index_name,
                    dimensions,
                    metric
                );
                self.create_index(dimensions, metric).await?
            }
        };

        *self.host.write() = Some(description.host);
        Ok(())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let url = self.data_url("/vectors/upsert")?;
        let vectors: Vec<WireVector> = records
            .iter()
            .map(|record| WireVector {
                id: &record.id,
                values: &record.values,
                metadata: serde_json::to_value(&record.metadata).unwrap_or(Value::Null),
            })
            .collect();

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({ "vectors": vectors }))
            .send()
            .await
            .map_err(|e| Error::upstream(Stage::VectorIndex, format!("upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Stage::VectorIndex,
                format!("upsert failed: HTTP {} - {}", status, body),
            ));
        }

        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let url = self.data_url("/query")?;
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::upstream(Stage::VectorIndex, format!("query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                Stage::VectorIndex,
                format!("query failed: HTTP {} - {}", status, body),
            ));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            Error::upstream(Stage::VectorIndex, format!("failed to parse query response: {}", e))
        })?;

        let mut matches = Vec::with_capacity(parsed.matches.len());
        for m in parsed.matches {
            let metadata = match m.metadata.as_ref().and_then(Self::parse_metadata) {
                Some(metadata) => metadata,
                None => {
                    tracing::warn!("match {} has no usable metadata, skipping", m.id);
                    continue;
                }
            };
            matches.push(ScoredMatch {
                id: m.id,
                score: m.score,
                metadata,
            });
        }

        Ok(matches)
    }

    async fn delete_by_document(&self, document_id: &Uuid) -> Result<usize> {
        let prefix = Segment::id_prefix(document_id);
        let ids = self.list_ids_by_prefix(&prefix).await?;

        if ids.is_empty() {
            return Ok(0);
        }

        let url = self.data_url("/vectors/delete")?;
        for batch in ids.chunks(DELETE_BATCH) {
            let response = self
                .client
                .post(&url)
                .header("Api-Key", &self.api_key)
                .json(&serde_json::json!({ "ids": batch }))
                .send()
                .await
                .map_err(|e| Error::upstream(Stage::VectorIndex, format!("delete failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::upstream(
                    Stage::VectorIndex,
                    format!("delete failed: HTTP {} - {}", status, body),
                ));
            }
        }

        Ok(ids.len())
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
