//! Document ingestion: scan the data directory, chunk each text file,
//! embed every chunk, and batch-upsert the vectors into the index.
//!
//! Chunk ids are derived from the file name (`guide.txt_chunk_0`), so
//! re-ingesting the same corpus overwrites records in place instead of
//! accumulating duplicates.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::chunk::{chunk_words, CHUNK_WORDS};
use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::models::{ChunkMetadata, IngestReport, VectorRecord};
use crate::store::VectorIndex;

/// Records per upsert request.
pub const UPSERT_BATCH: usize = 100;

const TXT_GLOB: &str = "**/*.txt";

pub async fn run_ingest(
    config: &Config,
    embedder: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
) -> Result<IngestReport> {
    let data_dir = &config.ingest.data_dir;
    if !data_dir.exists() {
        bail!("Data directory does not exist: {}", data_dir.display());
    }

    let files = scan_text_files(data_dir)?;
    if files.is_empty() {
        println!("No .txt files found in {}", data_dir.display());
        return Ok(IngestReport::default());
    }

    index.ensure_ready().await?;

    let mut report = IngestReport::default();
    let mut records: Vec<VectorRecord> = Vec::new();

    for path in &files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("Processing {}...", filename);

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let chunks = chunk_words(&text, CHUNK_WORDS);

        for (i, chunk) in chunks.iter().enumerate() {
            let values = embedder.embed(chunk).await?;
            records.push(VectorRecord {
                id: format!("{}_chunk_{}", filename, i),
                values,
                metadata: ChunkMetadata {
                    text: chunk.clone(),
                    source: filename.clone(),
                },
            });
        }

        report.files += 1;
        report.chunks += chunks.len();
    }

    tracing::info!(
        "Embedded {} chunk(s) with {}",
        records.len(),
        embedder.model_name()
    );

    for batch in records.chunks(UPSERT_BATCH) {
        report.upserted += index.upsert(batch).await?;
    }

    println!(
        "Ingestion complete: {} file(s), {} chunk(s), {} vector(s) upserted.",
        report.files, report.chunks, report.upserted
    );

    Ok(report)
}

/// Recursively collect `*.txt` files under `root`, sorted for
/// deterministic ordering.
fn scan_text_files(root: &Path) -> Result<Vec<PathBuf>> {
    let matcher = text_globset()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !matcher.is_match(relative) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn text_globset() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new(TXT_GLOB)?);
    Ok(builder.build()?)
}
