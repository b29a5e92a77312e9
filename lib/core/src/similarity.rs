// Dense pairwise similarity over normalized vectors
use crate::sparse::SparseVector;
use crate::{Error, Result};
use tracing::debug;

/// Symmetric n×n matrix of inner products, stored row-major
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute every pairwise inner product. Fails with a resource error when
    /// `vectors.len()` exceeds `max_items`.
    pub fn compute(vectors: &[SparseVector], max_items: usize) -> Result<Self> {
        let n = vectors.len();
        if n > max_items {
            return Err(Error::Resource {
                items: n,
                ceiling: max_items,
            });
        }

        let mut data = vec![0.0f32; n * n];
        for i in 0..n {
            for j in i..n {
                let score = vectors[i].dot(&vectors[j]);
                data[i * n + j] = score;
                data[j * n + i] = score;
            }
        }
        debug!("Computed {}x{} similarity matrix", n, n);

        Ok(Self { n, data })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}
