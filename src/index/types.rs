//! Shared types used by the vector index and document store.

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the in-memory index structures.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A vector with the wrong dimensionality was offered for insertion.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was created with.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },
    /// Vector and entry batches differ in length.
    #[error("Vector/entry count mismatch: {vectors} vectors, {entries} entries")]
    CountMismatch {
        /// Number of vectors in the batch.
        vectors: usize,
        /// Number of entries in the batch.
        entries: usize,
    },
    /// Referenced document is not present in the store.
    #[error("Document '{doc_id}' not found")]
    DocumentNotFound {
        /// Identifier that failed to resolve.
        doc_id: Uuid,
    },
    /// Referenced chunk is not present in the store.
    #[error("Chunk {chunk_index} of document '{doc_id}' not found")]
    ChunkNotFound {
        /// Document the chunk was expected under.
        doc_id: Uuid,
        /// Position of the missing chunk.
        chunk_index: usize,
    },
}

/// Association between an indexed vector and the chunk it embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryRef {
    /// Owning document.
    pub doc_id: Uuid,
    /// Position of the chunk within the document.
    pub chunk_index: usize,
}

/// Entry paired with its similarity score for a query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredEntry {
    /// The matched index entry.
    pub entry: EntryRef,
    /// Inner-product similarity against the query vector.
    pub score: f32,
}
