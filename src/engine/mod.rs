//! Question-answering pipeline: chunking, retrieval, and answer synthesis.

pub mod answer;
pub mod chunking;
pub mod query;
mod service;
pub mod topics;
pub mod types;

pub use service::{QaApi, QaService};
pub use types::{
    Answer, AskRequest, DocumentInfo, EngineError, HealthSnapshot, RankedChunk, UploadOutcome,
};
