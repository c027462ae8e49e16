//! Core data types that flow through the ingestion and answering pipelines.

/// A bounded-length piece of the extracted document text.
///
/// `start` is the byte offset of the chunk in the source text. Consecutive
/// chunks overlap, so offsets are what reconstruct the original ordering
/// (and the original text) unambiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: usize,
    pub text: String,
}

/// A chunk returned from the vector store, with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub chunk_index: i64,
    pub score: f32,
}

/// Summary of one ingestion run, printed by the CLI and logged by the server.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Characters of text extracted from the PDF.
    pub chars: usize,
    /// Number of chunks embedded and published.
    pub chunks: usize,
    /// Physical collection the index generation was written to.
    pub collection: String,
}

/// Outcome of the answering pipeline.
///
/// Failures (provider errors, store connectivity) are `Err` on the
/// surrounding `Result`; this type only distinguishes the two success
/// shapes so the boundary can choose how to present them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Text generated by the chat model from retrieved context.
    Generated(String),
    /// Nothing has been ingested yet; there is no collection to search.
    NotIndexed,
}
