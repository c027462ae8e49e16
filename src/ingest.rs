//! Ingestion pipeline orchestration.
//!
//! Coordinates the full upload flow: PDF text extraction → chunking →
//! embedding → publishing a new index generation. Each ingest replaces the
//! previous generation wholesale; there is no partial commit.

use anyhow::{Context, Result};
use std::path::Path;

use crate::chunk::split_text;
use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::extract;
use crate::models::IngestReport;
use crate::store::VectorStore;

/// Ingest a PDF from disk. Both the CLI and the upload handler (after
/// spooling the request body to a temporary file) come through here.
pub async fn ingest_pdf_file(
    config: &Config,
    embedder: &EmbeddingClient,
    store: &VectorStore,
    path: &Path,
) -> Result<IngestReport> {
    let text = extract::extract_pdf_file(path)?;
    ingest_text(config, embedder, store, &text)
        .await
        .with_context(|| format!("failed to ingest {}", path.display()))
}

async fn ingest_text(
    config: &Config,
    embedder: &EmbeddingClient,
    store: &VectorStore,
    text: &str,
) -> Result<IngestReport> {
    let chunks = split_text(
        text,
        config.chunking.chunk_chars,
        config.chunking.overlap_chars,
    );

    tracing::info!(chars = text.len(), chunks = chunks.len(), "ingesting document");

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_batch(&texts).await?;

    // An empty document still publishes: uploading replaces prior content
    // unconditionally, chunks or not.
    let collection = store.publish(&chunks, vectors).await?;

    Ok(IngestReport {
        chars: text.len(),
        chunks: chunks.len(),
        collection,
    })
}
