//! Top-k cosine retrieval over the vector index.

use konsult_core::error::{KonsultError, Result};
use konsult_core::traits::EmbeddingProvider;
use konsult_core::types::Passage;
use std::sync::Arc;

use crate::index::VectorIndex;

/// A retrieved passage with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

/// Read-only retrieval handle shared across per-message tasks.
///
/// Takes the embedder at construction so queries are guaranteed to live in
/// the same embedding space as the index entries. Querying an index built
/// with a different model or provider is undefined behavior.
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Return the top `k` passages by descending cosine similarity.
    ///
    /// Ties keep insertion order (stable sort) so results are
    /// deterministic. An empty index short-circuits without embedding the
    /// query — no provider call, no cost. `k == 0` is a contract violation.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredPassage>> {
        if k == 0 {
            return Err(KonsultError::InvalidArgument(
                "retrieval k must be at least 1".into(),
            ));
        }
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = query_vectors
            .first()
            .ok_or_else(|| KonsultError::Provider("embedder returned no query vector".into()))?;

        let mut scored: Vec<ScoredPassage> = self
            .index
            .entries()
            .iter()
            .map(|entry| ScoredPassage {
                passage: entry.passage.clone(),
                score: cosine_similarity(&entry.vector, query_vector),
            })
            .collect();

        // sort_by is stable; equal scores keep original insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Cosine similarity with a zero-norm guard (degenerate vectors score 0).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
