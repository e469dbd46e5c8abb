//! Per-modality engines: registry lookup, artifact loading, batched runs.
//!
//! Engines are the Rust-level surface the C boundary wraps. Each embeds or
//! scores through the batch scheduler, so chunking, ordering, and
//! all-or-nothing failure behave identically across modalities. Weights are
//! immutable after construction; engines are `Send + Sync` and safe to
//! share once built.

use std::path::PathBuf;

use tracing::info;

use embed_models::cache::{ensure_artifacts, ModelCache};
use embed_models::registry;
use embed_types::{Embedding, EngineResult, ModelInfo, RerankResult, SparseEmbedding};

use crate::backend::{
    BertEmbedder, ClipVisionEmbedder, CrossEncoderRanker, DenseBackend, RerankBackend,
    SparseBackend, SpladeEmbedder, VisionBackend,
};
use crate::scheduler::run_batched;

/// Construction options shared by all engines.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Override the artifact cache directory
    pub cache_dir: Option<PathBuf>,
    /// Override the model's maximum sequence length
    pub max_length: Option<usize>,
    /// Scheduler worker threads; 1 = sequential chunk execution
    pub workers: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_length: None,
            workers: 1,
        }
    }
}

impl EngineOptions {
    fn cache_for(&self, repo_id: &str) -> ModelCache {
        match &self.cache_dir {
            Some(dir) => ModelCache::new(dir.clone(), repo_id),
            None => ModelCache::for_repo(repo_id),
        }
    }
}

/// Dense text embedding engine.
pub struct TextEmbeddingEngine {
    info: ModelInfo,
    backend: Box<dyn DenseBackend>,
    workers: usize,
}

impl TextEmbeddingEngine {
    /// Create an engine for the given model code with default options.
    pub fn new(code: &str) -> EngineResult<Self> {
        Self::with_options(code, EngineOptions::default())
    }

    /// Create an engine for the given model code.
    pub fn with_options(code: &str, options: EngineOptions) -> EngineResult<Self> {
        let spec = registry::find_dense(code)?;
        let paths = ensure_artifacts(&options.cache_for(spec.code), spec.files)?;
        let backend = BertEmbedder::load(&paths, spec, options.max_length)?;
        info!(model = spec.code, "Text embedding engine ready");
        Ok(Self::from_backend(spec.to_info(), Box::new(backend), &options))
    }

    /// Create an engine around an already-constructed backend.
    pub fn from_backend(
        info: ModelInfo,
        backend: Box<dyn DenseBackend>,
        options: &EngineOptions,
    ) -> Self {
        Self {
            info,
            backend,
            workers: options.workers,
        }
    }

    /// Model information for this engine.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Embed `texts` in `batch_size`-sized chunks, outputs in input order.
    pub fn embed(&self, texts: &[String], batch_size: usize) -> EngineResult<Vec<Embedding>> {
        run_batched(texts, batch_size, self.workers, |chunk| {
            self.backend.embed_chunk(chunk)
        })
    }
}

/// Sparse text embedding engine.
pub struct SparseTextEmbeddingEngine {
    info: ModelInfo,
    backend: Box<dyn SparseBackend>,
    workers: usize,
}

impl SparseTextEmbeddingEngine {
    /// Create an engine for the given model code with default options.
    pub fn new(code: &str) -> EngineResult<Self> {
        Self::with_options(code, EngineOptions::default())
    }

    /// Create an engine for the given model code.
    pub fn with_options(code: &str, options: EngineOptions) -> EngineResult<Self> {
        let spec = registry::find_sparse(code)?;
        let paths = ensure_artifacts(&options.cache_for(spec.code), spec.files)?;
        let backend = SpladeEmbedder::load(&paths, spec, options.max_length)?;
        info!(model = spec.code, "Sparse embedding engine ready");
        Ok(Self::from_backend(spec.to_info(), Box::new(backend), &options))
    }

    /// Create an engine around an already-constructed backend.
    pub fn from_backend(
        info: ModelInfo,
        backend: Box<dyn SparseBackend>,
        options: &EngineOptions,
    ) -> Self {
        Self {
            info,
            backend,
            workers: options.workers,
        }
    }

    /// Model information for this engine.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Embed `texts` in `batch_size`-sized chunks, outputs in input order.
    pub fn embed(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> EngineResult<Vec<SparseEmbedding>> {
        run_batched(texts, batch_size, self.workers, |chunk| {
            self.backend.embed_chunk(chunk)
        })
    }
}

/// Image embedding engine; inputs are image file paths.
pub struct ImageEmbeddingEngine {
    info: ModelInfo,
    backend: Box<dyn VisionBackend>,
    workers: usize,
}

impl ImageEmbeddingEngine {
    /// Create an engine for the given model code with default options.
    pub fn new(code: &str) -> EngineResult<Self> {
        Self::with_options(code, EngineOptions::default())
    }

    /// Create an engine for the given model code.
    pub fn with_options(code: &str, options: EngineOptions) -> EngineResult<Self> {
        let spec = registry::find_image(code)?;
        let paths = ensure_artifacts(&options.cache_for(spec.code), spec.files)?;
        let backend = ClipVisionEmbedder::load(&paths, spec)?;
        info!(model = spec.code, "Image embedding engine ready");
        Ok(Self::from_backend(spec.to_info(), Box::new(backend), &options))
    }

    /// Create an engine around an already-constructed backend.
    pub fn from_backend(
        info: ModelInfo,
        backend: Box<dyn VisionBackend>,
        options: &EngineOptions,
    ) -> Self {
        Self {
            info,
            backend,
            workers: options.workers,
        }
    }

    /// Model information for this engine.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Embed image files in `batch_size`-sized chunks, outputs in input order.
    pub fn embed(&self, paths: &[String], batch_size: usize) -> EngineResult<Vec<Embedding>> {
        run_batched(paths, batch_size, self.workers, |chunk| {
            self.backend.embed_chunk(chunk)
        })
    }
}

/// Query/document rerank engine.
pub struct RerankEngine {
    info: ModelInfo,
    backend: Box<dyn RerankBackend>,
    workers: usize,
}

impl RerankEngine {
    /// Create an engine for the given model code with default options.
    pub fn new(code: &str) -> EngineResult<Self> {
        Self::with_options(code, EngineOptions::default())
    }

    /// Create an engine for the given model code.
    pub fn with_options(code: &str, options: EngineOptions) -> EngineResult<Self> {
        let spec = registry::find_rerank(code)?;
        let paths = ensure_artifacts(&options.cache_for(spec.code), spec.files)?;
        let backend = CrossEncoderRanker::load(&paths, spec, options.max_length)?;
        info!(model = spec.code, "Rerank engine ready");
        Ok(Self::from_backend(spec.to_info(), Box::new(backend), &options))
    }

    /// Create an engine around an already-constructed backend.
    pub fn from_backend(
        info: ModelInfo,
        backend: Box<dyn RerankBackend>,
        options: &EngineOptions,
    ) -> Self {
        Self {
            info,
            backend,
            workers: options.workers,
        }
    }

    /// Model information for this engine.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Score `documents` against `query` in `batch_size`-sized chunks, then
    /// sort by descending score (ties keep ascending input index).
    pub fn rerank(
        &self,
        query: &str,
        documents: &[String],
        return_documents: bool,
        batch_size: usize,
    ) -> EngineResult<Vec<RerankResult>> {
        let scores = run_batched(documents, batch_size, self.workers, |chunk| {
            self.backend.score_chunk(query, chunk)
        })?;

        let mut results: Vec<RerankResult> = scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| RerankResult {
                index,
                score,
                document: return_documents.then(|| documents[index].clone()),
            })
            .collect();

        embed_types::rerank::sort_by_score(&mut results);
        Ok(results)
    }
}
