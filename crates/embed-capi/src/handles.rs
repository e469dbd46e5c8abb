//! Opaque engine handles and their lifecycle.
//!
//! One newtype per modality wraps a boxed engine; callers only ever see the
//! raw pointer. Creation is the Uninitialized -> Ready transition, the free
//! functions are Ready -> Destroyed. Destroyed is terminal: the boundary
//! cannot observe prior destruction, so double-free and use-after-free are
//! documented caller contract violations, not recoverable errors.

use embed_engine::{
    ImageEmbeddingEngine, RerankEngine, SparseTextEmbeddingEngine, TextEmbeddingEngine,
};

/// Opaque handle to a dense text embedding engine.
pub struct TextEngineHandle(pub(crate) Box<TextEmbeddingEngine>);

impl TextEngineHandle {
    /// Wrap an engine built in-process (e.g. around an injected backend).
    pub fn new(engine: TextEmbeddingEngine) -> Self {
        Self(Box::new(engine))
    }

    /// Leak the handle as the raw pointer the C surface hands out.
    pub fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }
}

/// Opaque handle to a sparse text embedding engine.
pub struct SparseEngineHandle(pub(crate) Box<SparseTextEmbeddingEngine>);

impl SparseEngineHandle {
    /// Wrap an engine built in-process (e.g. around an injected backend).
    pub fn new(engine: SparseTextEmbeddingEngine) -> Self {
        Self(Box::new(engine))
    }

    /// Leak the handle as the raw pointer the C surface hands out.
    pub fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }
}

/// Opaque handle to an image embedding engine.
pub struct ImageEngineHandle(pub(crate) Box<ImageEmbeddingEngine>);

impl ImageEngineHandle {
    /// Wrap an engine built in-process (e.g. around an injected backend).
    pub fn new(engine: ImageEmbeddingEngine) -> Self {
        Self(Box::new(engine))
    }

    /// Leak the handle as the raw pointer the C surface hands out.
    pub fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }
}

/// Opaque handle to a rerank engine.
pub struct RerankEngineHandle(pub(crate) Box<RerankEngine>);

impl RerankEngineHandle {
    /// Wrap an engine built in-process (e.g. around an injected backend).
    pub fn new(engine: RerankEngine) -> Self {
        Self(Box::new(engine))
    }

    /// Leak the handle as the raw pointer the C surface hands out.
    pub fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }
}

/// Destroy a text engine handle and release its model instance.
/// Not idempotent; the handle is invalid afterwards.
///
/// # Safety
/// `handle` must be null or a pointer returned by
/// `embridge_text_engine_new`, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_text_engine_free(handle: *mut TextEngineHandle) {
    if !handle.is_null() {
        let _ = Box::from_raw(handle);
    }
}

/// Destroy a sparse engine handle and release its model instance.
/// Not idempotent; the handle is invalid afterwards.
///
/// # Safety
/// `handle` must be null or a pointer returned by
/// `embridge_sparse_engine_new`, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_sparse_engine_free(handle: *mut SparseEngineHandle) {
    if !handle.is_null() {
        let _ = Box::from_raw(handle);
    }
}

/// Destroy an image engine handle and release its model instance.
/// Not idempotent; the handle is invalid afterwards.
///
/// # Safety
/// `handle` must be null or a pointer returned by
/// `embridge_image_engine_new`, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_image_engine_free(handle: *mut ImageEngineHandle) {
    if !handle.is_null() {
        let _ = Box::from_raw(handle);
    }
}

/// Destroy a rerank engine handle and release its model instance.
/// Not idempotent; the handle is invalid afterwards.
///
/// # Safety
/// `handle` must be null or a pointer returned by
/// `embridge_rerank_engine_new`, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_rerank_engine_free(handle: *mut RerankEngineHandle) {
    if !handle.is_null() {
        let _ = Box::from_raw(handle);
    }
}
