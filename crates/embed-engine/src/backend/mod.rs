//! Inference backends, one trait per modality.
//!
//! The engines treat backends as opaque chunk executors: a backend consumes
//! one chunk of raw inputs and returns one output per input. The Candle
//! implementations own their tokenizer/codec preprocessing; the stub
//! implementations exist so scheduler and boundary paths can be exercised
//! without model downloads.

pub mod dense;
pub mod rerank;
pub mod sparse;
pub mod stub;
pub mod vision;

use embed_types::{Embedding, EngineResult, SparseEmbedding};

/// Dense text embedding executor.
pub trait DenseBackend: Send + Sync {
    /// Output vector dimension.
    fn dim(&self) -> usize;

    /// Embed one chunk of texts, one vector per text, input order.
    fn embed_chunk(&self, texts: &[String]) -> EngineResult<Vec<Embedding>>;
}

/// Sparse text embedding executor.
pub trait SparseBackend: Send + Sync {
    /// Embed one chunk of texts, one (indices, values) pair per text.
    fn embed_chunk(&self, texts: &[String]) -> EngineResult<Vec<SparseEmbedding>>;
}

/// Image embedding executor; inputs are image file paths.
pub trait VisionBackend: Send + Sync {
    /// Output vector dimension.
    fn dim(&self) -> usize;

    /// Embed one chunk of image files, one vector per path, input order.
    fn embed_chunk(&self, paths: &[String]) -> EngineResult<Vec<Embedding>>;
}

/// Query/document relevance scorer.
pub trait RerankBackend: Send + Sync {
    /// Score one chunk of documents against the query, one score per
    /// document, input order.
    fn score_chunk(&self, query: &str, documents: &[String]) -> EngineResult<Vec<f32>>;
}

pub use dense::BertEmbedder;
pub use rerank::CrossEncoderRanker;
pub use sparse::SpladeEmbedder;
pub use vision::ClipVisionEmbedder;
