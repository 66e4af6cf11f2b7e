#![deny(missing_docs)]

//! Core library for the DocQA question-answering server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and adapters.
pub mod embedding;
/// Question-answering engine: chunking, retrieval, and answer synthesis.
pub mod engine;
/// In-memory vector index and document store.
pub mod index;
/// Structured logging and tracing setup.
pub mod logging;
/// Ingestion and query metrics helpers.
pub mod metrics;
