//! Core data types and error definitions for the question-answering engine.

use crate::embedding::EmbeddingClientError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors emitted by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller supplied malformed input (empty question, zero `top_k`, blank filename).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Referenced document is not indexed.
    #[error("Document '{doc_id}' not found")]
    NotFound {
        /// Identifier that failed to resolve.
        doc_id: Uuid,
    },
    /// Embedding provider failed to produce vectors.
    #[error("Failed to generate embeddings: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// Returned embedding dimension does not match configuration.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension configured on the server.
        expected: usize,
        /// Actual embedding dimension produced by the provider.
        actual: usize,
    },
    /// Embedding provider returned no vectors.
    #[error("Embedding provider returned no vectors for the query")]
    EmptyEmbedding,
    /// Document store and vector index disagree about what exists.
    ///
    /// Fatal invariant breach; surfaced to the caller rather than repaired in place.
    #[error("Index inconsistency: {0}")]
    Inconsistency(String),
}

/// Summary of a completed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    /// Identifier assigned to the document.
    pub doc_id: Uuid,
    /// Filename supplied by the caller.
    pub filename: String,
    /// Number of searchable chunks produced.
    pub num_chunks: usize,
}

/// Document listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// Identifier assigned at upload.
    pub doc_id: Uuid,
    /// Filename supplied by the caller.
    pub filename: String,
    /// Number of searchable chunks stored for the document.
    pub num_chunks: usize,
}

/// Parameters supplied to the ask pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    /// Natural language question to answer.
    pub question: String,
    /// Optional document scope; `None` searches every document.
    #[serde(default)]
    pub doc_id: Option<Uuid>,
    /// Optional override for the number of passages retrieved.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// One retrieved passage with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct RankedChunk {
    /// 1-based position in the ranked result list.
    pub rank: usize,
    /// Owning document.
    pub doc_id: Uuid,
    /// Filename of the owning document.
    pub filename: String,
    /// Position of the chunk within its document.
    pub chunk_index: usize,
    /// Inner-product similarity against the question vector.
    pub score: f32,
    /// Chunk text truncated to the configured display budget.
    pub preview: String,
}

/// Synthesized response returned by `ask`.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// The original question as supplied by the caller.
    pub question: String,
    /// Synthesized answer text.
    pub answer: String,
    /// Confidence in `[0, 1]`, monotonic in the top similarity score.
    pub confidence: f32,
    /// Ranked passages backing the answer.
    pub sources: Vec<RankedChunk>,
    /// Document scope applied to the search, if any.
    pub doc_id: Option<Uuid>,
}

/// Counts reported by the `health` operation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthSnapshot {
    /// Number of documents currently indexed.
    pub total_documents: usize,
    /// Number of chunks currently indexed.
    pub total_chunks: usize,
    /// Dimensionality of stored vectors.
    pub embedding_dim: usize,
}
