//! Deterministic stub backends.
//!
//! Return content-derived outputs without loading any model, so scheduler
//! ordering and boundary marshaling can be tested offline.

use embed_types::{Embedding, EngineResult, SparseEmbedding};

use crate::backend::{DenseBackend, RerankBackend, SparseBackend, VisionBackend};

/// Content marker: byte sum of the input string.
fn marker(text: &str) -> f32 {
    text.bytes().map(|b| b as f32).sum()
}

/// Dense stub: vector of `dim` zeros with the content marker at position 0.
pub struct StubDenseBackend {
    pub dim: usize,
}

impl DenseBackend for StubDenseBackend {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_chunk(&self, texts: &[String]) -> EngineResult<Vec<Embedding>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut values = vec![0.0; self.dim];
                values[0] = marker(text);
                Embedding::from_normalized(values)
            })
            .collect())
    }
}

/// Sparse stub: one nonzero entry per byte of input, capped at 4.
pub struct StubSparseBackend;

impl SparseBackend for StubSparseBackend {
    fn embed_chunk(&self, texts: &[String]) -> EngineResult<Vec<SparseEmbedding>> {
        Ok(texts
            .iter()
            .map(|text| {
                let nnz = text.len().clamp(1, 4);
                let indices: Vec<usize> = (0..nnz).map(|i| i * 100 + text.len()).collect();
                let values: Vec<f32> = (0..nnz).map(|i| marker(text) + i as f32).collect();
                SparseEmbedding::new(indices, values)
            })
            .collect())
    }
}

/// Vision stub: same shape convention as the dense stub, keyed on the path.
pub struct StubVisionBackend {
    pub dim: usize,
}

impl VisionBackend for StubVisionBackend {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_chunk(&self, paths: &[String]) -> EngineResult<Vec<Embedding>> {
        Ok(paths
            .iter()
            .map(|path| {
                let mut values = vec![0.0; self.dim];
                values[0] = marker(path);
                Embedding::from_normalized(values)
            })
            .collect())
    }
}

/// Rerank stub: score is the document length, so equal-length documents tie.
pub struct StubRerankBackend;

impl RerankBackend for StubRerankBackend {
    fn score_chunk(&self, _query: &str, documents: &[String]) -> EngineResult<Vec<f32>> {
        Ok(documents.iter().map(|doc| doc.len() as f32).collect())
    }
}
