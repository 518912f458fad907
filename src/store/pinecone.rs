//! Pinecone-backed [`VectorIndex`].
//!
//! Talks to two REST surfaces: the control plane (`api.pinecone.io`) for
//! describing and creating indexes, and the per-index data plane (the
//! `host` reported by the control plane) for upserts and queries. The
//! data-plane host is resolved once and cached for the life of the client.
//!
//! The index is created serverless (aws / us-east-1) with cosine metric
//! and the embedding model's dimensionality. Requests authenticate with
//! the `Api-Key` header.

use std::sync::RwLock;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::PineconeConfig;
use crate::embedding::EMBEDDING_DIMENSIONS;
use crate::models::{ScoredMatch, VectorRecord};

use super::VectorIndex;

const API_VERSION: &str = "2025-01";
const METRIC: &str = "cosine";
const SERVERLESS_CLOUD: &str = "aws";
const SERVERLESS_REGION: &str = "us-east-1";

/// Attempts and spacing when waiting for a newly created index.
const READY_POLL_ATTEMPTS: u32 = 30;
const READY_POLL_DELAY: Duration = Duration::from_secs(2);

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
    status: IndexStatus,
}

#[derive(Deserialize)]
struct IndexStatus {
    ready: bool,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredMatch>,
}

/// Vector index hosted on Pinecone.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    control_base: String,
    index_name: String,
    /// Cached data-plane base URL, resolved from the control plane.
    data_base: RwLock<Option<String>>,
}

impl PineconeIndex {
    pub fn new(config: &PineconeConfig, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            control_base: config.api_base.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            data_base: RwLock::new(None),
        })
    }

    /// Describe the index on the control plane. `None` means it does not
    /// exist yet.
    async fn describe_index(&self) -> Result<Option<IndexDescription>> {
        let url = format!("{}/indexes/{}", self.control_base, self.index_name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Pinecone describe index error {}: {}", status, body_text);
        }

        Ok(Some(response.json().await?))
    }

    async fn create_index(&self) -> Result<()> {
        let body = serde_json::json!({
            "name": self.index_name,
            "dimension": EMBEDDING_DIMENSIONS,
            "metric": METRIC,
            "spec": {
                "serverless": {
                    "cloud": SERVERLESS_CLOUD,
                    "region": SERVERLESS_REGION,
                }
            }
        });

        let url = format!("{}/indexes", self.control_base);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        // 409: another process created it first, which is fine.
        if !status.is_success() && status != reqwest::StatusCode::CONFLICT {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Pinecone create index error {}: {}", status, body_text);
        }

        Ok(())
    }

    fn cache_host(&self, host: &str) -> String {
        // The control plane reports a bare hostname; mock servers in tests
        // report a full URL.
        let base = if host.starts_with("http") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host)
        };
        *self.data_base.write().unwrap() = Some(base.clone());
        base
    }

    /// Resolve (and cache) the data-plane base URL for the index.
    async fn data_base(&self) -> Result<String> {
        if let Some(base) = self.data_base.read().unwrap().clone() {
            return Ok(base);
        }

        let description = self.describe_index().await?.ok_or_else(|| {
            anyhow::anyhow!(
                "Pinecone index '{}' does not exist; run `rag ingest` to create and populate it",
                self.index_name
            )
        })?;

        tracing::debug!(
            "Resolved Pinecone index '{}' host: {}",
            self.index_name,
            description.host
        );
        Ok(self.cache_host(&description.host))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn ensure_ready(&self) -> Result<()> {
        match self.describe_index().await? {
            Some(description) if description.status.ready => {
                self.cache_host(&description.host);
                return Ok(());
            }
            Some(_) => {
                tracing::info!("Pinecone index '{}' exists but is not ready", self.index_name);
            }
            None => {
                tracing::info!(
                    "Creating Pinecone index '{}' ({} dims, {} metric, {}/{})",
                    self.index_name,
                    EMBEDDING_DIMENSIONS,
                    METRIC,
                    SERVERLESS_CLOUD,
                    SERVERLESS_REGION
                );
                self.create_index().await?;
            }
        }

        for _ in 0..READY_POLL_ATTEMPTS {
            tokio::time::sleep(READY_POLL_DELAY).await;
            if let Some(description) = self.describe_index().await? {
                if description.status.ready {
                    self.cache_host(&description.host);
                    return Ok(());
                }
            }
        }

        bail!(
            "Pinecone index '{}' did not become ready in time",
            self.index_name
        )
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let base = self.data_base().await?;
        let url = format!("{}/vectors/upsert", base);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&UpsertRequest { vectors: records })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Pinecone upsert error {}: {}", status, body_text);
        }

        let parsed: UpsertResponse = response.json().await?;
        Ok(parsed.upserted_count)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let base = self.data_base().await?;
        let url = format!("{}/query", base);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Pinecone query error {}: {}", status, body_text);
        }

        let parsed: QueryResponse = response.json().await?;
        Ok(parsed.matches)
    }
}
