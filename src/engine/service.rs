//! Engine service coordinating chunking, embedding, indexing, and retrieval.

use crate::{
    config::get_config,
    embedding::{EmbeddingClient, get_embedding_client},
    engine::{
        answer::synthesize,
        chunking::{ChunkPolicy, chunk_text},
        query::expand_query,
        topics::extract_topics,
        types::{
            Answer, AskRequest, DocumentInfo, EngineError, HealthSnapshot, RankedChunk,
            UploadOutcome,
        },
    },
    index::{DocumentStore, EntryRef, FlatIndex, IndexError},
    metrics::{EngineMetrics, MetricsSnapshot},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Coordinates the full pipeline: chunking, embedding, vector search, and synthesis.
///
/// The service owns the document store and vector index behind a single reader/writer
/// lock, so uploads and deletes serialize against each other while queries run
/// concurrently against a consistent snapshot. A rebuild-based delete swaps the whole
/// index under the write lock, which is why no read may interleave with it. Construct
/// the service once near process start and share it through an `Arc`.
pub struct QaService {
    embedding_client: Box<dyn EmbeddingClient + Send + Sync>,
    state: RwLock<EngineState>,
    metrics: Arc<EngineMetrics>,
}

struct EngineState {
    store: DocumentStore,
    index: FlatIndex,
}

/// Abstraction over the engine operations used by external surfaces.
#[async_trait]
pub trait QaApi: Send + Sync {
    /// Chunk, embed, and index a raw text document.
    async fn upload(&self, filename: String, text: String) -> Result<UploadOutcome, EngineError>;

    /// Answer a question from the indexed chunks.
    async fn ask(&self, request: AskRequest) -> Result<Answer, EngineError>;

    /// Enumerate indexed documents in upload order.
    async fn list_documents(&self) -> Vec<DocumentInfo>;

    /// Remove a document and every vector it owns.
    async fn delete_document(&self, doc_id: Uuid) -> Result<(), EngineError>;

    /// Derive topic phrases from a document's chunks.
    async fn topics(&self, doc_id: Uuid) -> Result<Vec<String>, EngineError>;

    /// Report index-wide counts for diagnostics.
    async fn health(&self) -> HealthSnapshot;

    /// Retrieve the current metrics snapshot.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl QaService {
    /// Build a new engine service with an empty index.
    pub fn new() -> Self {
        let config = get_config();
        tracing::info!(
            dimension = config.embedding_dimension,
            "Initializing embedding client"
        );
        let embedding_client = get_embedding_client();
        Self {
            embedding_client,
            state: RwLock::new(EngineState {
                store: DocumentStore::new(),
                index: FlatIndex::new(config.embedding_dimension),
            }),
            metrics: Arc::new(EngineMetrics::new()),
        }
    }

    /// Build a service around a caller-supplied embedding client.
    pub fn with_embedding_client(client: Box<dyn EmbeddingClient + Send + Sync>) -> Self {
        let config = get_config();
        Self {
            embedding_client: client,
            state: RwLock::new(EngineState {
                store: DocumentStore::new(),
                index: FlatIndex::new(config.embedding_dimension),
            }),
            metrics: Arc::new(EngineMetrics::new()),
        }
    }

    /// Chunk, embed, and index a document.
    ///
    /// All fallible work (chunking, embedding, dimension checks) happens before the
    /// write lock is taken, so a failed upload commits nothing.
    pub async fn upload(
        &self,
        filename: String,
        text: String,
    ) -> Result<UploadOutcome, EngineError> {
        let filename = filename.trim().to_string();
        if filename.is_empty() {
            return Err(EngineError::InvalidArgument(
                "filename must not be empty".into(),
            ));
        }

        let config = get_config();
        let policy = ChunkPolicy {
            size: config.chunk_size,
            overlap: config.chunk_overlap,
            min_length: config.min_chunk_length,
        };
        let chunks = chunk_text(&text, policy);

        if chunks.is_empty() {
            // Degenerate content is non-fatal: the document is registered with
            // zero searchable chunks and reported as such.
            tracing::warn!(filename = %filename, "Document produced no chunks");
        }

        let vectors = if chunks.is_empty() {
            Vec::new()
        } else {
            self.embedding_client
                .generate_embeddings(chunks.clone())
                .await?
        };
        for vector in &vectors {
            ensure_dimension(vector, config.embedding_dimension)?;
        }
        debug_assert_eq!(chunks.len(), vectors.len());

        let num_chunks = chunks.len();
        let mut state = self.state.write().await;
        verify_consistency(&state)?;

        let doc_id = state.store.add_document(filename.clone(), chunks);
        let entries: Vec<EntryRef> = (0..num_chunks)
            .map(|chunk_index| EntryRef { doc_id, chunk_index })
            .collect();
        if let Err(error) = state.index.insert(vectors, entries) {
            // Neither half may commit alone; undo the store write before failing.
            let _ = state.store.remove_document(doc_id);
            return Err(map_index_error(error));
        }

        verify_consistency(&state)?;
        drop(state);

        self.metrics.record_document(num_chunks as u64);
        tracing::info!(
            doc_id = %doc_id,
            filename = %filename,
            chunks = num_chunks,
            "Document indexed"
        );

        Ok(UploadOutcome {
            doc_id,
            filename,
            num_chunks,
        })
    }

    /// Answer a question, optionally scoped to one document.
    pub async fn ask(&self, request: AskRequest) -> Result<Answer, EngineError> {
        let question = request.question.trim().to_string();
        if question.is_empty() {
            return Err(EngineError::InvalidArgument(
                "question must not be empty".into(),
            ));
        }
        if request.top_k == Some(0) {
            return Err(EngineError::InvalidArgument(
                "top_k must be at least 1".into(),
            ));
        }

        let config = get_config();
        let requested = request
            .top_k
            .unwrap_or(config.search_default_top_k)
            .min(config.search_max_top_k);

        let expanded = expand_query(&question);
        let mut vectors = self
            .embedding_client
            .generate_embeddings(vec![expanded])
            .await?;
        let query_vector = vectors.pop().ok_or(EngineError::EmptyEmbedding)?;
        ensure_dimension(&query_vector, config.embedding_dimension)?;

        let state = self.state.read().await;
        if let Some(doc_id) = request.doc_id {
            if !state.store.contains(doc_id) {
                return Err(EngineError::NotFound { doc_id });
            }
        }

        let total = state.index.len();
        let (sources, top_text) = if total == 0 {
            (Vec::new(), None)
        } else {
            let k = requested.clamp(1, total);
            let scope_filter;
            let filter: Option<&dyn Fn(&EntryRef) -> bool> = match request.doc_id {
                Some(doc_id) => {
                    scope_filter = move |entry: &EntryRef| entry.doc_id == doc_id;
                    Some(&scope_filter)
                }
                None => None,
            };
            let hits = state.index.search(&query_vector, k, filter);
            resolve_hits(&state.store, &hits, config.preview_max_chars)?
        };

        drop(state);
        self.metrics.record_question();

        let synthesis = synthesize(&sources, top_text.as_deref(), request.doc_id);
        tracing::info!(
            doc_id = ?request.doc_id,
            passages = sources.len(),
            confidence = synthesis.confidence,
            "Question answered"
        );

        Ok(Answer {
            question,
            answer: synthesis.answer,
            confidence: synthesis.confidence,
            sources,
            doc_id: request.doc_id,
        })
    }

    /// Enumerate indexed documents in upload order.
    pub async fn list_documents(&self) -> Vec<DocumentInfo> {
        let state = self.state.read().await;
        state
            .store
            .iter()
            .map(|record| DocumentInfo {
                doc_id: record.doc_id,
                filename: record.filename.clone(),
                num_chunks: record.chunks.len(),
            })
            .collect()
    }

    /// Remove a document and rebuild the index without its vectors.
    ///
    /// An unknown `doc_id` fails before anything is touched, leaving the index
    /// byte-for-byte identical.
    pub async fn delete_document(&self, doc_id: Uuid) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        verify_consistency(&state)?;

        state
            .store
            .remove_document(doc_id)
            .map_err(|_| EngineError::NotFound { doc_id })?;
        state.index = state.index.rebuild_without(doc_id);

        verify_consistency(&state)?;
        let remaining = state.index.len();
        drop(state);

        self.metrics.record_deletion();
        tracing::info!(doc_id = %doc_id, remaining_chunks = remaining, "Document deleted");
        Ok(())
    }

    /// Derive topic phrases from a document's stored chunks.
    pub async fn topics(&self, doc_id: Uuid) -> Result<Vec<String>, EngineError> {
        let state = self.state.read().await;
        let record = state
            .store
            .get(doc_id)
            .map_err(|_| EngineError::NotFound { doc_id })?;
        Ok(extract_topics(record.chunks.iter().map(String::as_str)))
    }

    /// Report index-wide counts for diagnostics.
    pub async fn health(&self) -> HealthSnapshot {
        let state = self.state.read().await;
        HealthSnapshot {
            total_documents: state.store.len(),
            total_chunks: state.index.len(),
            embedding_dim: get_config().embedding_dimension,
        }
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for QaService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QaApi for QaService {
    async fn upload(&self, filename: String, text: String) -> Result<UploadOutcome, EngineError> {
        QaService::upload(self, filename, text).await
    }

    async fn ask(&self, request: AskRequest) -> Result<Answer, EngineError> {
        QaService::ask(self, request).await
    }

    async fn list_documents(&self) -> Vec<DocumentInfo> {
        QaService::list_documents(self).await
    }

    async fn delete_document(&self, doc_id: Uuid) -> Result<(), EngineError> {
        QaService::delete_document(self, doc_id).await
    }

    async fn topics(&self, doc_id: Uuid) -> Result<Vec<String>, EngineError> {
        QaService::topics(self, doc_id).await
    }

    async fn health(&self) -> HealthSnapshot {
        QaService::health(self).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        QaService::metrics_snapshot(self)
    }
}

/// Check the store/index chunk-count invariant, surfacing a violation as fatal.
fn verify_consistency(state: &EngineState) -> Result<(), EngineError> {
    let store_chunks = state.store.total_chunks();
    let index_len = state.index.len();
    if store_chunks != index_len {
        return Err(EngineError::Inconsistency(format!(
            "store holds {store_chunks} chunks, index holds {index_len} vectors"
        )));
    }
    Ok(())
}

fn ensure_dimension(vector: &[f32], expected: usize) -> Result<(), EngineError> {
    if vector.len() != expected {
        return Err(EngineError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

fn map_index_error(error: IndexError) -> EngineError {
    match error {
        IndexError::DimensionMismatch { expected, actual } => {
            EngineError::DimensionMismatch { expected, actual }
        }
        IndexError::DocumentNotFound { doc_id } => EngineError::NotFound { doc_id },
        other => EngineError::Inconsistency(other.to_string()),
    }
}

/// Resolve scored entries back to text, producing ranked sources and the top passage.
fn resolve_hits(
    store: &DocumentStore,
    hits: &[crate::index::ScoredEntry],
    preview_max_chars: usize,
) -> Result<(Vec<RankedChunk>, Option<String>), EngineError> {
    let mut sources = Vec::with_capacity(hits.len());
    let mut top_text = None;

    for (position, hit) in hits.iter().enumerate() {
        // A dangling entry means the store and index have diverged; per the
        // consistency contract this is surfaced, never papered over.
        let record = store
            .get(hit.entry.doc_id)
            .map_err(|error| EngineError::Inconsistency(error.to_string()))?;
        let text = store
            .chunk_text(hit.entry.doc_id, hit.entry.chunk_index)
            .map_err(|error| EngineError::Inconsistency(error.to_string()))?;

        if position == 0 {
            top_text = Some(text.to_string());
        }
        sources.push(RankedChunk {
            rank: position + 1,
            doc_id: hit.entry.doc_id,
            filename: record.filename.clone(),
            chunk_index: hit.entry.chunk_index,
            score: hit.score,
            preview: truncate_preview(text, preview_max_chars),
        });
    }

    Ok((sources, top_text))
}

/// Truncate chunk text to a display budget measured in characters.
fn truncate_preview(text: &str, max_chars: usize) -> String {
    let mut iter = text.char_indices();
    match iter.nth(max_chars) {
        Some((byte_end, _)) => {
            let mut preview = text[..byte_end].trim_end().to_string();
            preview.push('…');
            preview
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_preview_keeps_short_text_intact() {
        assert_eq!(truncate_preview("short", 200), "short");
    }

    #[test]
    fn truncate_preview_cuts_on_character_budget() {
        let text = "x".repeat(300);
        let preview = truncate_preview(&text, 200);
        assert_eq!(preview.chars().count(), 201);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn truncate_preview_respects_multibyte_boundaries() {
        let text = "é".repeat(250);
        let preview = truncate_preview(&text, 200);
        assert!(preview.ends_with('…'));
        assert_eq!(preview.chars().count(), 201);
    }
}
