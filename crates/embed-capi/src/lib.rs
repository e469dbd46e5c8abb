//! # embridge
//!
//! C ABI boundary for embed-bridge: opaque engine handles, flat
//! length-tagged result arrays, and a message-carrying error object.
//!
//! ## Ownership contract
//!
//! - Strings passed in are borrowed for the duration of the call.
//! - Every non-handle pointer returned (results, model lists, errors) is
//!   caller-owned and must be released through its matching
//!   `embridge_*_free` function, never through a generic deallocator.
//! - Handles are exclusively caller-owned; `embridge_*_engine_free` is not
//!   idempotent. Calling it twice, or using a handle after freeing it, is
//!   undefined behavior.
//! - Handles carry no synchronization. Concurrent calls on one handle
//!   require external mutual exclusion on the caller's side.
//!
//! ## Error convention
//!
//! A failing call returns null and, when the caller supplied an error
//! slot, writes exactly one heap-allocated [`error::EmbridgeError`] there.
//! A successful call leaves the slot untouched. Result and error are never
//! both non-null.

pub mod error;
pub mod handles;
pub mod image;
pub mod logging;
pub mod marshal;
pub mod rerank;
pub mod sparse;
pub mod text;
mod util;

pub use error::{embridge_error_free, EmbridgeError};
pub use handles::{
    embridge_image_engine_free, embridge_rerank_engine_free, embridge_sparse_engine_free,
    embridge_text_engine_free, ImageEngineHandle, RerankEngineHandle, SparseEngineHandle,
    TextEngineHandle,
};
pub use image::{
    embridge_image_engine_embed, embridge_image_engine_list_models, embridge_image_engine_new,
};
pub use logging::embridge_init_tracing;
pub use marshal::{
    embridge_dense_result_free, embridge_model_list_free, embridge_rerank_result_free,
    embridge_sparse_result_free, DenseVec, DenseVecArray, ModelEntry, ModelEntryArray,
    RerankEntry, RerankEntryArray, SparseVec, SparseVecArray,
};
pub use rerank::{
    embridge_rerank_engine_list_models, embridge_rerank_engine_new, embridge_rerank_engine_rerank,
};
pub use sparse::{
    embridge_sparse_engine_embed, embridge_sparse_engine_list_models, embridge_sparse_engine_new,
};
pub use text::{
    embridge_text_engine_embed, embridge_text_engine_list_models, embridge_text_engine_new,
};
