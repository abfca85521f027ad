//! Exact cosine-similarity index over the current document's chunks

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::types::Chunk;

/// One indexed chunk: its identifier paired with its embedding
struct IndexEntry {
    chunk_index: u32,
    vector: Vec<f32>,
    norm: f32,
}

/// Brute-force similarity index
///
/// Holds every chunk's embedding and scans all of them per query, so
/// results are exact. Sized for a single document with hundreds to a few
/// thousand chunks.
pub struct VectorIndex {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from chunks and their embeddings
    ///
    /// Requires one vector per chunk; any vector whose length differs from
    /// `dimensions` fails the whole build.
    pub fn build(chunks: &[Chunk], vectors: Vec<Vec<f32>>, dimensions: usize) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(Error::config(format!(
                "chunk/vector count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.iter().zip(vectors) {
            if vector.len() != dimensions {
                return Err(Error::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            entries.push(IndexEntry {
                chunk_index: chunk.index,
                vector,
                norm,
            });
        }

        Ok(Self {
            dimensions,
            entries,
        })
    }

    /// Find the `k` most similar chunks to a query vector
    ///
    /// Returns at most `min(k, len)` pairs of (chunk index, score) in strictly
    /// descending score order; equal scores break by ascending chunk index so
    /// results are reproducible.
    pub fn query(&self, query_vector: &[f32], k: usize) -> Result<Vec<(u32, f32)>> {
        if k == 0 {
            return Err(Error::config("k must be positive"));
        }
        if query_vector.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: query_vector.len(),
            });
        }

        let query_norm = query_vector.iter().map(|x| x * x).sum::<f32>().sqrt();

        let mut scored: Vec<(u32, f32)> = self
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(&entry.vector, entry.norm, query_vector, query_norm);
                (entry.chunk_index, score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);

        Ok(scored)
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension the index was built with
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity with precomputed norms; zero vectors score 0.0
fn cosine_similarity(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: u32) -> Chunk {
        Chunk::new(index, 0, 1, format!("chunk {index}"))
    }

    fn build(vectors: Vec<Vec<f32>>) -> VectorIndex {
        let chunks: Vec<Chunk> = (0..vectors.len() as u32).map(chunk).collect();
        VectorIndex::build(&chunks, vectors, 3).unwrap()
    }

    #[test]
    fn rejects_wrong_dimension_vector() {
        let chunks = vec![chunk(0)];
        let err = VectorIndex::build(&chunks, vec![vec![1.0, 0.0]], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn rejects_count_mismatch() {
        let chunks = vec![chunk(0), chunk(1)];
        assert!(VectorIndex::build(&chunks, vec![vec![1.0, 0.0, 0.0]], 3).is_err());
    }

    #[test]
    fn rejects_wrong_dimension_query() {
        let index = build(vec![vec![1.0, 0.0, 0.0]]);
        assert!(matches!(
            index.query(&[1.0, 0.0], 1),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_zero_k() {
        let index = build(vec![vec![1.0, 0.0, 0.0]]);
        assert!(index.query(&[1.0, 0.0, 0.0], 0).is_err());
    }

    #[test]
    fn orders_by_descending_similarity() {
        let index = build(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.7, 0.7, 0.0],
        ]);
        let results = index.query(&[1.0, 0.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].0, 2);
        assert_eq!(results[2].0, 0);
        assert!(results[0].1 >= results[1].1 && results[1].1 >= results[2].1);
    }

    #[test]
    fn never_returns_more_than_available() {
        let index = build(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
        let results = index.query(&[1.0, 0.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn ties_break_by_ascending_chunk_index() {
        // identical vectors produce identical scores
        let index = build(vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ]);
        let results = index.query(&[1.0, 0.0, 0.0], 3).unwrap();
        let order: Vec<u32> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn identical_vector_scores_near_one() {
        let v = vec![0.3, -0.5, 0.81];
        let index = build(vec![v.clone()]);
        let results = index.query(&v, 1).unwrap();
        assert!((results[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn near_identical_vectors_score_within_tolerance() {
        // embeddings of identical text are only semantically stable, so the
        // round-trip check uses a cosine tolerance rather than equality
        let a = vec![0.30001, -0.49999, 0.81];
        let b = vec![0.3, -0.5, 0.81];
        let index = build(vec![a]);
        let results = index.query(&b, 1).unwrap();
        assert!((results[0].1 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let index = build(vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]]);
        let results = index.query(&[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].1, 0.0);
    }
}
