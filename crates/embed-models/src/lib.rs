//! # embed-models
//!
//! Model registry and artifact cache for embed-bridge.
//!
//! The registry is a static, read-only catalog of the models each modality
//! supports. The cache downloads model artifacts from HuggingFace Hub on
//! first use and serves them from disk afterwards.

pub mod cache;
pub mod registry;

pub use cache::{ensure_artifacts, ArtifactPaths, ModelCache};
pub use registry::{
    dense_models, find_dense, find_image, find_rerank, find_sparse, image_models, list_infos,
    rerank_models, sparse_models, ModelSpec, Pooling,
};
