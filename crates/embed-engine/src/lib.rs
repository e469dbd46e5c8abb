//! # embed-engine
//!
//! Local embedding inference for embed-bridge using Candle.
//!
//! This crate holds the pieces between the model registry and the C
//! boundary: preprocessors (tokenization, image decoding), inference
//! backends, the batch scheduler, and one engine type per modality.
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - Dense, sparse (SPLADE), image (CLIP), and rerank (cross-encoder) models
//! - Deterministic chunked batching with optional worker-pool execution
//! - Automatic model file caching via embed-models

pub mod backend;
pub mod engine;
pub mod preprocess;
pub mod scheduler;

pub use engine::{
    EngineOptions, ImageEmbeddingEngine, RerankEngine, SparseTextEmbeddingEngine,
    TextEmbeddingEngine,
};
