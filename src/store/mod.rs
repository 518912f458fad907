//! Vector index abstraction.
//!
//! The [`VectorIndex`] trait defines the operations the pipeline and the
//! ingestion runner need from a vector store, enabling pluggable backends:
//! the hosted Pinecone index in production and an in-memory index for
//! tests. Implementations must be `Send + Sync`.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`ensure_ready`](VectorIndex::ensure_ready) | Create the backing index if needed and wait until usable |
//! | [`upsert`](VectorIndex::upsert) | Insert or overwrite records by id |
//! | [`query`](VectorIndex::query) | Top-K cosine similarity search with metadata |

pub mod memory;
pub mod pinecone;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ScoredMatch, VectorRecord};

/// Abstract vector store holding embedded document chunks.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Ensure the backing index exists and is ready for reads and writes.
    ///
    /// Creates it on first use. Idempotent.
    async fn ensure_ready(&self) -> Result<()>;

    /// Insert or overwrite records. Records with an existing id replace
    /// the stored vector rather than duplicating it. Returns the number
    /// of records written.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize>;

    /// Return the `top_k` nearest neighbors of `vector` by cosine
    /// similarity, ordered by descending score, with metadata included.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>>;
}
