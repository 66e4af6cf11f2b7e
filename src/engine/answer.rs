//! Deterministic answer synthesis from ranked passages.
//!
//! No generative model runs here: the top passage is returned verbatim with a trailer
//! naming the evidence count and search scope, and confidence is a clamp of the top
//! similarity score. The module is a seam — a language-model-backed synthesizer could
//! replace [`synthesize`] without changing the answer/confidence/sources contract.

use crate::engine::types::RankedChunk;
use uuid::Uuid;

/// Confidence reported when no passage matched at all.
pub const CONFIDENCE_FLOOR: f32 = 0.0;

/// Answer text used when retrieval produced no evidence.
pub const NO_EVIDENCE_ANSWER: &str =
    "I could not find any relevant information in the indexed documents.";

/// Synthesized answer text plus its confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Human-readable answer.
    pub answer: String,
    /// Confidence in `[0, 1]`; [`CONFIDENCE_FLOOR`] when `sources` was empty.
    pub confidence: f32,
}

/// Build an answer from ranked passages.
///
/// Deterministic: identical input always yields an identical synthesis. Confidence is
/// the top score clamped into `[0, 1]` — scores are inner products of unit vectors, so
/// values above 1 cannot occur and negatives floor at 0.
pub fn synthesize(sources: &[RankedChunk], top_text: Option<&str>, scope: Option<Uuid>) -> Synthesis {
    let Some(top) = sources.first() else {
        return Synthesis {
            answer: NO_EVIDENCE_ANSWER.to_string(),
            confidence: CONFIDENCE_FLOOR,
        };
    };

    let scope_label = match scope {
        Some(doc_id) => format!("document {doc_id}"),
        None => "all indexed documents".to_string(),
    };
    let body = top_text.unwrap_or(top.preview.as_str());
    let answer = format!(
        "{body}\n\n(Based on {} passage(s) from {scope_label}.)",
        sources.len()
    );

    Synthesis {
        answer,
        confidence: top.score.clamp(0.0, 1.0),
    }
}
