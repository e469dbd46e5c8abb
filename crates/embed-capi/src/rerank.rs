//! Reranking surface.

use std::os::raw::c_char;
use std::ptr;

use tracing::debug;

use embed_engine::RerankEngine;
use embed_models::registry;

use crate::error::{write_error, EmbridgeError};
use crate::handles::RerankEngineHandle;
use crate::marshal::{model_list_into_raw, rerank_into_raw, ModelEntryArray, RerankEntryArray};
use crate::util::{borrow_str, collect_strings};

/// Model used when the caller passes a null model code.
const DEFAULT_MODEL: &str = "cross-encoder/ms-marco-MiniLM-L-6-v2";

/// Create a rerank engine.
///
/// Returns a Ready handle, or null with one error written to `error` (when
/// non-null). Never both.
///
/// # Safety
/// `model_code` must be null or a valid NUL-terminated string; `error`
/// must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_rerank_engine_new(
    model_code: *const c_char,
    error: *mut *mut EmbridgeError,
) -> *mut RerankEngineHandle {
    let code = match borrow_str(model_code, "model code") {
        Ok(code) => code.unwrap_or(DEFAULT_MODEL),
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    match RerankEngine::new(code) {
        Ok(engine) => Box::into_raw(Box::new(RerankEngineHandle(Box::new(engine)))),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// Score `num_documents` documents against `query`, chunked by
/// `batch_size`, and return entries sorted by descending score (ties keep
/// ascending input index).
///
/// `return_documents` controls whether each entry carries a caller-owned
/// copy of its document text; otherwise the `document` field is null.
///
/// # Safety
/// `handle` must be a live handle from `embridge_rerank_engine_new`;
/// `query` must be a valid NUL-terminated string; `documents` must point
/// to `num_documents` valid NUL-terminated strings; `error` must be null
/// or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_rerank_engine_rerank(
    handle: *mut RerankEngineHandle,
    query: *const c_char,
    documents: *const *const c_char,
    num_documents: usize,
    return_documents: bool,
    batch_size: usize,
    error: *mut *mut EmbridgeError,
) -> *mut RerankEntryArray {
    if handle.is_null() {
        write_error(
            &embed_types::EngineError::InvalidArgument("null handle".to_string()),
            error,
        );
        return ptr::null_mut();
    }
    let engine = &(*handle).0;

    let query = match borrow_str(query, "query") {
        Ok(Some(query)) => query,
        Ok(None) => {
            write_error(
                &embed_types::EngineError::InvalidArgument("null query".to_string()),
                error,
            );
            return ptr::null_mut();
        }
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    let documents = match collect_strings(documents, num_documents, "document") {
        Ok(documents) => documents,
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    debug!(model = %engine.info().code, count = num_documents, "Rerank call");

    match engine.rerank(query, &documents, return_documents, batch_size) {
        Ok(results) => rerank_into_raw(results),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// List supported rerank models.
///
/// The returned list is caller-owned; release with
/// `embridge_model_list_free`.
#[no_mangle]
pub extern "C" fn embridge_rerank_engine_list_models() -> *mut ModelEntryArray {
    model_list_into_raw(registry::list_infos(registry::rerank_models()))
}
