//! HTTP surface for DocQA.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /documents` – Chunk a raw text document, generate embeddings, and index them.
//!   Returns `{doc_id, filename, num_chunks}` for scoping future questions.
//! - `GET /documents` – List indexed documents in upload order.
//! - `DELETE /documents/:doc_id` – Remove a document and rebuild the index without it.
//! - `POST /ask` – Answer a natural-language question, optionally scoped to one document.
//! - `GET /documents/:doc_id/topics` – Heading-shaped topic phrases for a document.
//! - `GET /health` – Index-wide counts for liveness checks.
//! - `GET /metrics` – Observe ingestion and query counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Handlers are generic over [`QaApi`] so tests can drive the router with a stub engine.

use crate::engine::{AskRequest, DocumentInfo, EngineError, QaApi, UploadOutcome};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Build the HTTP router exposing the question-answering API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: QaApi + 'static,
{
    Router::new()
        .route(
            "/documents",
            get(list_documents::<S>).post(upload_document::<S>),
        )
        .route("/documents/:doc_id", axum::routing::delete(delete_document::<S>))
        .route("/documents/:doc_id/topics", get(document_topics::<S>))
        .route("/ask", post(ask_question::<S>))
        .route("/health", get(health::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for the `POST /documents` endpoint.
#[derive(Deserialize)]
struct UploadRequest {
    /// Display name recorded for the document.
    filename: String,
    /// Raw extracted text to chunk and index.
    text: String,
}

/// Success response for the `POST /documents` endpoint.
#[derive(Serialize)]
struct UploadResponse {
    doc_id: Uuid,
    filename: String,
    num_chunks: usize,
}

/// Index a document from raw text.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError>
where
    S: QaApi,
{
    let UploadOutcome {
        doc_id,
        filename,
        num_chunks,
    } = service.upload(request.filename, request.text).await?;
    tracing::info!(doc_id = %doc_id, chunks = num_chunks, "Upload request completed");
    Ok(Json(UploadResponse {
        doc_id,
        filename,
        num_chunks,
    }))
}

/// Response body for `GET /documents`.
#[derive(Serialize)]
struct DocumentsResponse {
    documents: Vec<DocumentInfo>,
}

/// List indexed documents in upload order.
async fn list_documents<S>(State(service): State<Arc<S>>) -> Json<DocumentsResponse>
where
    S: QaApi,
{
    let documents = service.list_documents().await;
    Json(DocumentsResponse { documents })
}

/// Response body for `DELETE /documents/:doc_id`.
#[derive(Serialize)]
struct DeleteResponse {
    deleted: Uuid,
}

/// Remove a document and every vector it owns.
async fn delete_document<S>(
    State(service): State<Arc<S>>,
    Path(doc_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError>
where
    S: QaApi,
{
    service.delete_document(doc_id).await?;
    Ok(Json(DeleteResponse { deleted: doc_id }))
}

/// Answer a question against the indexed documents.
async fn ask_question<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<crate::engine::Answer>, AppError>
where
    S: QaApi,
{
    let answer = service.ask(request).await?;
    Ok(Json(answer))
}

/// Response body for `GET /documents/:doc_id/topics`.
#[derive(Serialize)]
struct TopicsResponse {
    topics: Vec<String>,
}

/// Derive topic phrases for one document.
async fn document_topics<S>(
    State(service): State<Arc<S>>,
    Path(doc_id): Path<Uuid>,
) -> Result<Json<TopicsResponse>, AppError>
where
    S: QaApi,
{
    let topics = service.topics(doc_id).await?;
    Ok(Json(TopicsResponse { topics }))
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    total_documents: usize,
    total_chunks: usize,
    embedding_dim: usize,
}

/// Report index-wide counts for liveness checks.
async fn health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: QaApi,
{
    let snapshot = service.health().await;
    Json(HealthResponse {
        status: "ok",
        total_documents: snapshot.total_documents,
        total_chunks: snapshot.total_chunks,
        embedding_dim: snapshot.embedding_dim,
    })
}

/// Return a concise metrics snapshot with ingestion and query counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: QaApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/documents",
                description: "Chunk a raw text document, generate embeddings, and index them. Response returns { \"doc_id\": string, \"num_chunks\": number }.",
                request_example: Some(json!({
                    "filename": "handbook.pdf",
                    "text": "Document contents"
                })),
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/ask",
                description: "Answer a natural-language question from the indexed chunks, optionally scoped to one document.",
                request_example: Some(json!({
                    "question": "Can I wear lenses while swimming?",
                    "doc_id": "00000000-0000-0000-0000-000000000000",
                    "top_k": 5
                })),
            },
            CommandDescriptor {
                name: "list_documents",
                method: "GET",
                path: "/documents",
                description: "Return indexed documents with their chunk counts, in upload order.",
                request_example: None,
            },
            CommandDescriptor {
                name: "delete_document",
                method: "DELETE",
                path: "/documents/{doc_id}",
                description: "Remove a document and rebuild the vector index without its chunks.",
                request_example: None,
            },
            CommandDescriptor {
                name: "topics",
                method: "GET",
                path: "/documents/{doc_id}/topics",
                description: "Derive heading-shaped topic phrases from a document's chunks.",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Return document/chunk counts and the embedding dimension.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return ingestion and query counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(EngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Embedding(_)
            | EngineError::DimensionMismatch { .. }
            | EngineError::EmptyEmbedding
            | EngineError::Inconsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.0.to_string()).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(inner: EngineError) -> Self {
        Self(inner)
    }
}
