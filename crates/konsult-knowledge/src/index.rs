//! Flat vector index with JSON persistence.
//!
//! Built once at startup and read-only afterwards; per-message pipeline
//! tasks share it behind an `Arc` without locking. The corpus is a few
//! hundred passages at most, so there is no acceleration structure beyond
//! the entry list itself.

use konsult_core::error::{KonsultError, Result};
use konsult_core::traits::EmbeddingProvider;
use konsult_core::types::{EmbeddedPassage, Passage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Similarity-searchable container of embedded passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    entries: Vec<EmbeddedPassage>,
    dimension: usize,
}

impl VectorIndex {
    /// An explicitly empty index. Retrieval over it returns zero results;
    /// missing knowledge is a degraded mode, not an error.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            dimension: 0,
        }
    }

    /// Embed all passages in one batch and build the index.
    ///
    /// All-or-nothing: if the embedding call fails, no partial index is
    /// produced. Entry order matches passage order, which is what makes
    /// tie-breaking in the retriever deterministic.
    pub async fn build(
        passages: Vec<Passage>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        if passages.is_empty() {
            return Ok(Self::empty());
        }

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let vectors = embedder.embed(&texts).await?;

        if vectors.len() != passages.len() {
            return Err(KonsultError::Provider(format!(
                "embedder returned {} vectors for {} passages",
                vectors.len(),
                passages.len()
            )));
        }

        let dimension = vectors[0].len();
        if vectors.iter().any(|v| v.len() != dimension) {
            return Err(KonsultError::Provider(
                "embedder returned vectors of mixed dimensionality".into(),
            ));
        }

        let entries = passages
            .into_iter()
            .zip(vectors)
            .map(|(passage, vector)| EmbeddedPassage { passage, vector })
            .collect();

        Ok(Self { entries, dimension })
    }

    /// Persist to a single JSON file, creating parent directories.
    ///
    /// serde_json prints floats in shortest-round-trip form, so vectors
    /// survive save/load bit-for-bit and retrieval results are identical
    /// before and after.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)
            .map_err(|e| KonsultError::IndexCorrupt(format!("serialize failed: {e}")))?;
        std::fs::write(path, content)?;
        tracing::info!("Saved index ({} passages) to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Load a previously persisted index.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KonsultError::IndexNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let index: Self = serde_json::from_str(&content)
            .map_err(|e| KonsultError::IndexCorrupt(format!("{}: {e}", path.display())))?;
        tracing::info!("Loaded index ({} passages) from {}", index.entries.len(), path.display());
        Ok(index)
    }

    pub fn entries(&self) -> &[EmbeddedPassage] {
        &self.entries
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic stub embedder: a vector derived from character counts.
    /// Identical texts always get identical vectors.
    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 8];
                    for (i, c) in t.chars().enumerate() {
                        v[i % 8] += (c as u32 % 97) as f32 / 97.0;
                    }
                    v
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(KonsultError::Provider("embedding service down".into()))
        }
    }

    fn passages(texts: &[&str]) -> Vec<Passage> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Passage {
                text: t.to_string(),
                source_offset: i * 10,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_build_sets_dimension_and_order() {
        let index = VectorIndex::build(passages(&["one", "two", "three"]), &StubEmbedder)
            .await
            .unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 8);
        assert_eq!(index.entries()[0].passage.text, "one");
        assert_eq!(index.entries()[2].passage.text, "three");
    }

    #[tokio::test]
    async fn test_build_empty_is_empty_index() {
        let index = VectorIndex::build(Vec::new(), &StubEmbedder).await.unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), 0);
    }

    #[tokio::test]
    async fn test_build_failure_yields_no_partial_index() {
        let result = VectorIndex::build(passages(&["a", "b"]), &FailingEmbedder).await;
        assert!(matches!(result, Err(KonsultError::Provider(_))));
    }

    #[tokio::test]
    async fn test_save_load_round_trip_bit_for_bit() {
        let index = VectorIndex::build(passages(&["alpha", "beta", "gamma"]), &StubEmbedder)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index.json");
        index.save(&path).unwrap();
        let loaded = VectorIndex::load(&path).unwrap();

        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.dimension(), index.dimension());
        for (a, b) in index.entries().iter().zip(loaded.entries()) {
            assert_eq!(a.passage, b.passage);
            // Bit-for-bit, not approximate.
            assert_eq!(
                a.vector.iter().map(|f| f.to_bits()).collect::<Vec<_>>(),
                b.vector.iter().map(|f| f.to_bits()).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, KonsultError::IndexNotFound(_)));
    }

    #[test]
    fn test_load_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "not json at all {").unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, KonsultError::IndexCorrupt(_)));
    }
}
