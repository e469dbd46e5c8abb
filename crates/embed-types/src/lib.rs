//! # embed-types
//!
//! Shared domain types for the embed-bridge workspace.
//!
//! This crate defines the values that flow between the registry, the
//! engines, and the C boundary:
//! - Dense, sparse, and rerank result types
//! - Model descriptions returned by listing operations
//! - The unified [`EngineError`] taxonomy
//!
//! ## Usage
//!
//! ```rust
//! use embed_types::{Embedding, EngineError};
//! ```

pub mod embedding;
pub mod error;
pub mod model;
pub mod rerank;

pub use embedding::{Embedding, SparseEmbedding};
pub use error::{EngineError, EngineResult};
pub use model::ModelInfo;
pub use rerank::RerankResult;
