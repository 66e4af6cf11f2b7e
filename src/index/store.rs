//! Authoritative record of documents and their chunk text.
//!
//! The store owns chunk text separately from the vector index: answer synthesis needs
//! the original text, and the index only needs `(doc_id, chunk_index)` keys. Records
//! keep insertion order, which `list` exposes to callers.

use crate::index::types::IndexError;
use uuid::Uuid;

/// One uploaded document with its ordered chunk texts.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    /// Identifier generated at upload.
    pub doc_id: Uuid,
    /// Original filename supplied by the caller.
    pub filename: String,
    /// Chunk texts in chunk-index order.
    pub chunks: Vec<String>,
}

/// Insertion-ordered collection of uploaded documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<DocumentRecord>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, generating a fresh id, and return that id.
    pub fn add_document(&mut self, filename: String, chunks: Vec<String>) -> Uuid {
        let doc_id = Uuid::new_v4();
        self.documents.push(DocumentRecord {
            doc_id,
            filename,
            chunks,
        });
        doc_id
    }

    /// Remove a document, returning its record.
    pub fn remove_document(&mut self, doc_id: Uuid) -> Result<DocumentRecord, IndexError> {
        let position = self
            .documents
            .iter()
            .position(|record| record.doc_id == doc_id)
            .ok_or(IndexError::DocumentNotFound { doc_id })?;
        Ok(self.documents.remove(position))
    }

    /// Look up a document record by id.
    pub fn get(&self, doc_id: Uuid) -> Result<&DocumentRecord, IndexError> {
        self.documents
            .iter()
            .find(|record| record.doc_id == doc_id)
            .ok_or(IndexError::DocumentNotFound { doc_id })
    }

    /// Whether the given document exists.
    pub fn contains(&self, doc_id: Uuid) -> bool {
        self.documents.iter().any(|record| record.doc_id == doc_id)
    }

    /// Resolve a chunk back to its original text.
    pub fn chunk_text(&self, doc_id: Uuid, chunk_index: usize) -> Result<&str, IndexError> {
        let record = self.get(doc_id)?;
        record
            .chunks
            .get(chunk_index)
            .map(String::as_str)
            .ok_or(IndexError::ChunkNotFound {
                doc_id,
                chunk_index,
            })
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.iter()
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total chunk count across all documents.
    pub fn total_chunks(&self) -> usize {
        self.documents.iter().map(|record| record.chunks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get_round_trip() {
        let mut store = DocumentStore::new();
        let doc_id = store.add_document(
            "guide.pdf".into(),
            vec!["first chunk".into(), "second chunk".into()],
        );

        let record = store.get(doc_id).unwrap();
        assert_eq!(record.filename, "guide.pdf");
        assert_eq!(record.chunks.len(), 2);
        assert_eq!(store.total_chunks(), 2);
        assert_eq!(store.chunk_text(doc_id, 1).unwrap(), "second chunk");
    }

    #[test]
    fn ids_are_unique_per_upload() {
        let mut store = DocumentStore::new();
        let a = store.add_document("a.txt".into(), vec![]);
        let b = store.add_document("a.txt".into(), vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut store = DocumentStore::new();
        store.add_document("first.txt".into(), vec!["x".into()]);
        store.add_document("second.txt".into(), vec!["y".into()]);

        let names: Vec<&str> = store.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["first.txt", "second.txt"]);
    }

    #[test]
    fn remove_unknown_document_fails() {
        let mut store = DocumentStore::new();
        let error = store.remove_document(Uuid::new_v4()).unwrap_err();
        assert!(matches!(error, IndexError::DocumentNotFound { .. }));
    }

    #[test]
    fn remove_deletes_chunk_records() {
        let mut store = DocumentStore::new();
        let keep = store.add_document("keep.txt".into(), vec!["k".into()]);
        let doomed = store.add_document("doomed.txt".into(), vec!["d1".into(), "d2".into()]);

        let removed = store.remove_document(doomed).unwrap();
        assert_eq!(removed.chunks.len(), 2);
        assert!(store.contains(keep));
        assert!(!store.contains(doomed));
        assert_eq!(store.total_chunks(), 1);
        assert!(matches!(
            store.chunk_text(doomed, 0),
            Err(IndexError::DocumentNotFound { .. })
        ));
    }

    #[test]
    fn chunk_text_rejects_out_of_range_index() {
        let mut store = DocumentStore::new();
        let doc_id = store.add_document("short.txt".into(), vec!["only".into()]);
        assert!(matches!(
            store.chunk_text(doc_id, 5),
            Err(IndexError::ChunkNotFound { .. })
        ));
    }
}
