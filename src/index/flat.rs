//! Flat inner-product vector index.
//!
//! Vectors live in a plain append-only list with a parallel entry list mapping each
//! position back to `(doc_id, chunk_index)`. Search is a brute-force scan, which keeps
//! scoped queries exact: the filter predicate is applied while scanning, so restricting
//! to one document never undersamples. The structure has no in-place delete; removal is
//! a full rebuild from the surviving rows (see [`FlatIndex::rebuild_without`]).

use crate::index::types::{EntryRef, IndexError, ScoredEntry};
use std::cmp::Ordering;
use uuid::Uuid;

/// Append-only store of normalized vectors with brute-force k-NN search.
///
/// Callers must insert L2-normalized vectors; the index computes raw inner products and
/// never renormalizes. Internal positions are lookup keys only and carry no ordering
/// guarantee for callers.
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    entries: Vec<EntryRef>,
}

impl FlatIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Dimensionality this index was created with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of vectors currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a batch of vectors and their chunk references.
    ///
    /// The batch is validated before anything is stored, so a failed insert leaves the
    /// index exactly as it was.
    pub fn insert(
        &mut self,
        vectors: Vec<Vec<f32>>,
        entries: Vec<EntryRef>,
    ) -> Result<(), IndexError> {
        if vectors.len() != entries.len() {
            return Err(IndexError::CountMismatch {
                vectors: vectors.len(),
                entries: entries.len(),
            });
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        self.vectors.extend(vectors);
        self.entries.extend(entries);
        Ok(())
    }

    /// Return up to `k` entries ranked by descending inner product against `query`.
    ///
    /// When `filter` is given, only entries it accepts are scored. Equal scores are
    /// ordered by ascending `(doc_id, chunk_index)` so results are deterministic.
    /// Searching an empty index yields an empty list, not an error.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&dyn Fn(&EntryRef) -> bool>,
    ) -> Vec<ScoredEntry> {
        if k == 0 || self.entries.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredEntry> = self
            .vectors
            .iter()
            .zip(self.entries.iter())
            .filter(|(_, entry)| filter.map_or(true, |accept| accept(entry)))
            .map(|(vector, entry)| ScoredEntry {
                entry: *entry,
                score: inner_product(query, vector),
            })
            .collect();

        scored.sort_by(compare_scored);
        scored.truncate(k);
        scored
    }

    /// Build a fresh index containing every vector except those owned by `doc_id`.
    ///
    /// The flat structure has no native delete, so removal re-inserts all surviving
    /// rows into a new index; cost is proportional to the remaining chunk count. The
    /// caller swaps the result in atomically under its own lock.
    pub fn rebuild_without(&self, doc_id: Uuid) -> Self {
        let mut rebuilt = Self::new(self.dimension);
        for (vector, entry) in self.vectors.iter().zip(self.entries.iter()) {
            if entry.doc_id != doc_id {
                rebuilt.vectors.push(vector.clone());
                rebuilt.entries.push(*entry);
            }
        }
        rebuilt
    }

    /// Whether any entry references `doc_id`.
    pub fn contains_document(&self, doc_id: Uuid) -> bool {
        self.entries.iter().any(|entry| entry.doc_id == doc_id)
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn compare_scored(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.entry.cmp(&b.entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(doc_id: Uuid, chunk_index: usize) -> EntryRef {
        EntryRef { doc_id, chunk_index }
    }

    #[test]
    fn search_on_empty_index_returns_nothing() {
        let index = FlatIndex::new(3);
        let hits = index.search(&[1.0, 0.0, 0.0], 5, None);
        assert!(hits.is_empty());
    }

    #[test]
    fn search_ranks_by_descending_inner_product() {
        let doc = Uuid::new_v4();
        let mut index = FlatIndex::new(3);
        index
            .insert(
                vec![
                    vec![0.0, 1.0, 0.0],
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                ],
                vec![entry(doc, 0), entry(doc, 1), entry(doc, 2)],
            )
            .unwrap();

        let hits = index.search(&[1.0, 0.0, 0.0], 2, None);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.chunk_index, 1);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn ties_break_by_ascending_entry_key() {
        let doc_a = Uuid::from_u128(1);
        let doc_b = Uuid::from_u128(2);
        let mut index = FlatIndex::new(2);
        index
            .insert(
                vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
                vec![entry(doc_b, 0), entry(doc_a, 1), entry(doc_a, 0)],
            )
            .unwrap();

        let hits = index.search(&[1.0, 0.0], 3, None);
        assert_eq!(hits[0].entry, entry(doc_a, 0));
        assert_eq!(hits[1].entry, entry(doc_a, 1));
        assert_eq!(hits[2].entry, entry(doc_b, 0));
    }

    #[test]
    fn filter_restricts_results_to_one_document() {
        let doc_a = Uuid::from_u128(1);
        let doc_b = Uuid::from_u128(2);
        let mut index = FlatIndex::new(2);
        index
            .insert(
                vec![vec![1.0, 0.0], vec![0.9, 0.1]],
                vec![entry(doc_a, 0), entry(doc_b, 0)],
            )
            .unwrap();

        let accept = |candidate: &EntryRef| candidate.doc_id == doc_b;
        let hits = index.search(&[1.0, 0.0], 10, Some(&accept));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.doc_id, doc_b);
    }

    #[test]
    fn insert_rejects_mismatched_dimension() {
        let mut index = FlatIndex::new(3);
        let error = index
            .insert(vec![vec![1.0, 0.0]], vec![entry(Uuid::new_v4(), 0)])
            .unwrap_err();
        assert!(matches!(error, IndexError::DimensionMismatch { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn insert_rejects_mismatched_batch_lengths() {
        let mut index = FlatIndex::new(2);
        let error = index
            .insert(vec![vec![1.0, 0.0]], vec![])
            .unwrap_err();
        assert!(matches!(error, IndexError::CountMismatch { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn rebuild_without_drops_all_and_only_that_document() {
        let doc_a = Uuid::from_u128(1);
        let doc_b = Uuid::from_u128(2);
        let mut index = FlatIndex::new(2);
        index
            .insert(
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]],
                vec![entry(doc_a, 0), entry(doc_a, 1), entry(doc_b, 0)],
            )
            .unwrap();

        let rebuilt = index.rebuild_without(doc_a);
        assert_eq!(rebuilt.len(), 1);
        assert!(!rebuilt.contains_document(doc_a));
        assert!(rebuilt.contains_document(doc_b));

        let hits = rebuilt.search(&[0.5, 0.5], 10, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.doc_id, doc_b);
    }
}
