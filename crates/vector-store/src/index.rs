use crate::embeddings::EmbeddingModel;
use crate::error::{Result, VectorStoreError};
use std::collections::HashMap;

/// Brute-force cosine index over record slots.
pub struct VectorIndex {
    dimension: usize,
    vectors: HashMap<usize, Vec<f32>>,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Add or replace the vector stored under `id`
    pub fn add(&mut self, id: usize, vector: &[f32]) -> Result<()> {
        self.check(vector)?;
        self.vectors.insert(id, vector.to_vec());
        Ok(())
    }

    pub fn remove(&mut self, id: usize) -> bool {
        self.vectors.remove(&id).is_some()
    }

    fn check(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Scores every slot accepted by `keep`, best first, at most `k`.
    /// Ties break on the lower slot so results are stable.
    pub fn search_where(
        &self,
        query: &[f32],
        k: usize,
        keep: impl Fn(usize) -> bool,
    ) -> Result<Vec<(usize, f32)>> {
        self.check(query)?;

        let mut scores: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .filter(|(id, _)| keep(**id))
            .map(|(id, vector)| (*id, EmbeddingModel::cosine_similarity(query, vector)))
            .collect();

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scores.truncate(k);

        Ok(scores)
    }

    /// Search for k nearest neighbors using cosine similarity
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        self.search_where(query, k, |_| true)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn clear(&mut self) {
        self.vectors.clear();
    }
}
