//! Core data models used throughout Acme RAG.
//!
//! These types represent the embedded chunks, retrieval matches, and
//! ingestion results that flow through the pipeline.

use serde::{Deserialize, Serialize};

/// Metadata stored alongside each vector in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Raw chunk text, returned with query matches for context assembly.
    pub text: String,
    /// Originating filename.
    pub source: String,
}

/// An embedded document chunk ready for upsert into the vector index.
///
/// The `id` is deterministic (`"<filename>_chunk_<i>"`), so re-ingesting
/// the same file overwrites prior vectors instead of duplicating them.
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// A single match returned from a vector index query.
///
/// `score` is cosine similarity; ordering within a response is descending
/// by score as ranked by the index.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<ChunkMetadata>,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub files: usize,
    pub chunks: usize,
    pub upserted: usize,
}
