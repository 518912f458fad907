//! Context retrieval: nearest-neighbor search plus relevance filtering.

use anyhow::Result;

use crate::store::VectorIndex;

/// Number of nearest neighbors requested from the index.
pub const TOP_K: usize = 7;

/// Matches scoring at or below this are treated as noise and dropped.
pub const SCORE_THRESHOLD: f32 = 0.15;

/// Query the index for the [`TOP_K`] nearest chunks and keep the text of
/// those scoring strictly above [`SCORE_THRESHOLD`], in the order the
/// index returned them. Matches without metadata carry no text and are
/// skipped.
pub async fn retrieve_contexts(
    index: &dyn VectorIndex,
    query_vector: &[f32],
) -> Result<Vec<String>> {
    let matches = index.query(query_vector, TOP_K).await?;

    let contexts: Vec<String> = matches
        .into_iter()
        .filter(|m| m.score > SCORE_THRESHOLD)
        .filter_map(|m| m.metadata.map(|meta| meta.text))
        .collect();

    tracing::debug!("Retrieved {} context chunk(s) above threshold", contexts.len());
    Ok(contexts)
}
