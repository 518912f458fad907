//! Word-bounded text chunker.
//!
//! Splits document text into chunks of at most [`CHUNK_WORDS`] words using
//! whitespace tokenization, with no sentence-boundary awareness. Words are
//! re-joined with single spaces, so chunking also collapses runs of
//! whitespace.

/// Maximum words per chunk.
pub const CHUNK_WORDS: usize = 500;

/// Split text into chunks of at most `max_words` whitespace-separated
/// words. An empty or all-whitespace text yields no chunks.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(max_words).map(|w| w.join(" ")).collect()
}
