//! HTTP API tests: the router is served on an ephemeral port and driven
//! with a real HTTP client, with stub providers behind the pipeline.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use acme_rag::embedding::EmbeddingProvider;
use acme_rag::generate::ChatProvider;
use acme_rag::models::{ChunkMetadata, VectorRecord};
use acme_rag::pipeline::RagPipeline;
use acme_rag::server::{app, AppState};
use acme_rag::store::memory::InMemoryIndex;
use acme_rag::store::VectorIndex;

struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }

    fn model_name(&self) -> &str {
        "fixed-embedder"
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        anyhow::bail!("embedding provider unreachable")
    }

    fn dimensions(&self) -> usize {
        0
    }

    fn model_name(&self) -> &str {
        "failing-embedder"
    }
}

struct FixedChat(String);

#[async_trait]
impl ChatProvider for FixedChat {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _temperature: f32,
    ) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Serve the app on an ephemeral port and return its base URL.
async fn spawn_server(pipeline: RagPipeline) -> String {
    let state = AppState::new(Arc::new(pipeline));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

fn stub_pipeline() -> RagPipeline {
    RagPipeline::new(
        Arc::new(FixedEmbedder(vec![1.0, 0.0])),
        Arc::new(InMemoryIndex::new()),
        Arc::new(FixedChat("stub answer".to_string())),
    )
}

#[tokio::test]
async fn test_root_liveness() -> Result<()> {
    let base = spawn_server(stub_pipeline()).await;

    let response = reqwest::get(&base).await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["message"],
        "RAG Chatbot API is running. Send POST requests to /api/chat."
    );

    Ok(())
}

#[tokio::test]
async fn test_chat_rule_query_needs_no_providers() -> Result<()> {
    // FailingEmbedder proves the rule path never reaches the providers.
    let pipeline = RagPipeline::new(
        Arc::new(FailingEmbedder),
        Arc::new(InMemoryIndex::new()),
        Arc::new(FixedChat("unused".to_string())),
    );
    let base = spawn_server(pipeline).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/chat", base))
        .json(&serde_json::json!({ "message": "products" }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    let answer = body["response"].as_str().unwrap();
    assert!(answer.starts_with("Acme Tech Solutions offers 5 main products"));

    Ok(())
}

#[tokio::test]
async fn test_chat_answers_from_retrieved_context() -> Result<()> {
    let index = Arc::new(InMemoryIndex::new());
    index
        .upsert(&[VectorRecord {
            id: "faq.txt_chunk_0".to_string(),
            values: vec![1.0, 0.0],
            metadata: ChunkMetadata {
                text: "Office hours are 9 to 5.".to_string(),
                source: "faq.txt".to_string(),
            },
        }])
        .await?;

    let pipeline = RagPipeline::new(
        Arc::new(FixedEmbedder(vec![1.0, 0.0])),
        index,
        Arc::new(FixedChat("Office hours run 9 to 5.".to_string())),
    );
    let base = spawn_server(pipeline).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/chat", base))
        .json(&serde_json::json!({ "message": "When is the office open?" }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["response"], "Office hours run 9 to 5.");

    Ok(())
}

#[tokio::test]
async fn test_pipeline_failure_maps_to_upstream_error() -> Result<()> {
    let pipeline = RagPipeline::new(
        Arc::new(FailingEmbedder),
        Arc::new(InMemoryIndex::new()),
        Arc::new(FixedChat("unused".to_string())),
    );
    let base = spawn_server(pipeline).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/chat", base))
        .json(&serde_json::json!({ "message": "anything retrieval-bound" }))
        .send()
        .await?;
    assert_eq!(response.status(), 502);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "upstream_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("embedding provider unreachable"));

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_rejected() -> Result<()> {
    let base = spawn_server(stub_pipeline()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/chat", base))
        .header("Content-Type", "application/json")
        .body("not json at all")
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin() -> Result<()> {
    let base = spawn_server(stub_pipeline()).await;

    let client = reqwest::Client::new();
    let response = client
        .get(&base)
        .header("Origin", "http://frontend.example")
        .send()
        .await?;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    Ok(())
}
