//! End-to-end question answering.
//!
//! A query moves through four stages:
//!
//! 1. Rule check on the raw text. A hit short-circuits everything below.
//! 2. Normalization (casefold, typo correction, shortcut expansion).
//! 3. Embedding of the normalized text and retrieval from the index.
//! 4. Answer generation from the retrieved context and the original query.
//!
//! The stages behind trait objects (embedding, index, chat) are injected,
//! so tests can swap in fakes and the server can share one pipeline across
//! requests.

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, Secrets};
use crate::embedding::{EmbeddingProvider, OpenAiEmbeddings};
use crate::generate::{generate_answer, ChatProvider, OpenAiChat};
use crate::normalize::normalize_query;
use crate::retrieve::retrieve_contexts;
use crate::rules::rule_answer;
use crate::store::pinecone::PineconeIndex;
use crate::store::VectorIndex;

/// The assembled question-answering pipeline.
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatProvider>,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            embedder,
            index,
            chat,
        }
    }

    /// Wire up the production providers: OpenAI for embedding and chat,
    /// Pinecone for retrieval.
    pub fn from_config(config: &Config, secrets: &Secrets) -> Result<Self> {
        let embedder = OpenAiEmbeddings::new(&config.openai, &secrets.openai_api_key)?;
        let index = PineconeIndex::new(&config.pinecone, &secrets.pinecone_api_key)?;
        let chat = OpenAiChat::new(&config.openai, &secrets.openai_api_key)?;

        Ok(Self::new(Arc::new(embedder), Arc::new(index), Arc::new(chat)))
    }

    /// Answer a user query.
    ///
    /// Rule-matched queries return canned guidance without touching any
    /// provider. Everything else is normalized, embedded, and answered
    /// from retrieved context; the generation stage sees the query as the
    /// user typed it.
    pub async fn get_answer(&self, query: &str) -> Result<String> {
        if let Some(guidance) = rule_answer(query) {
            tracing::debug!("Query matched a guidance rule");
            return Ok(guidance.to_string());
        }

        let normalized = normalize_query(query);
        tracing::debug!("Normalized query: {}", normalized);

        let query_vector = self.embedder.embed(&normalized).await?;
        let contexts = retrieve_contexts(self.index.as_ref(), &query_vector).await?;
        tracing::info!("Answering with {} context chunk(s)", contexts.len());

        generate_answer(self.chat.as_ref(), query, &contexts).await
    }
}
