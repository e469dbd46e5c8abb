//! Dense and sparse embedding values.

/// Dense vector embedding - a normalized float array.
#[derive(Debug, Clone)]
pub struct Embedding {
    /// The embedding vector (normalized to unit length)
    pub values: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding from a vector.
    /// Normalizes the vector to unit length.
    pub fn new(values: Vec<f32>) -> Self {
        let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let normalized = if norm > 0.0 {
            values.iter().map(|x| x / norm).collect()
        } else {
            values
        };
        Self { values: normalized }
    }

    /// Create embedding without normalization (for pre-normalized vectors)
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Get the embedding dimension
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Compute cosine similarity with another embedding.
    /// Returns value in [-1, 1] range (1 = identical).
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        // Since both are normalized, dot product = cosine similarity
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }
}

/// Sparse embedding - nonzero vocabulary weights only.
///
/// `indices` and `values` always have the same length. Indices are
/// vocabulary positions and are not required to be sorted.
#[derive(Debug, Clone)]
pub struct SparseEmbedding {
    /// Vocabulary indices of the nonzero weights
    pub indices: Vec<usize>,
    /// Weight per index, same order as `indices`
    pub values: Vec<f32>,
}

impl SparseEmbedding {
    /// Build a sparse embedding from parallel index/value lists.
    pub fn new(indices: Vec<usize>, values: Vec<f32>) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        Self { indices, values }
    }

    /// Number of nonzero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Collect nonzero positions from a dense weight row.
    pub fn from_dense_row(row: &[f32]) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, &v) in row.iter().enumerate() {
            if v > 0.0 {
                indices.push(i);
                values.push(v);
            }
        }
        Self { indices, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_normalization() {
        let emb = Embedding::new(vec![3.0, 4.0]);
        // 3-4-5 triangle: normalized should be [0.6, 0.8]
        assert!((emb.values[0] - 0.6).abs() < 0.001);
        assert!((emb.values[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let emb = Embedding::new(vec![0.0, 0.0, 0.0]);
        assert_eq!(emb.values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let emb1 = Embedding::new(vec![1.0, 0.0, 0.0]);
        let emb2 = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert!((emb1.cosine_similarity(&emb2) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_sparse_from_dense_row() {
        let sparse = SparseEmbedding::from_dense_row(&[0.0, 1.5, 0.0, 0.25, 0.0]);
        assert_eq!(sparse.indices, vec![1, 3]);
        assert_eq!(sparse.values, vec![1.5, 0.25]);
        assert_eq!(sparse.nnz(), 2);
    }

    #[test]
    fn test_sparse_index_value_parity() {
        let sparse = SparseEmbedding::new(vec![7, 42], vec![0.5, 0.1]);
        assert_eq!(sparse.indices.len(), sparse.values.len());
    }
}
