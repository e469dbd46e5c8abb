//! Sparse text embedding surface.

use std::os::raw::c_char;
use std::ptr;

use tracing::debug;

use embed_engine::SparseTextEmbeddingEngine;
use embed_models::registry;

use crate::error::{write_error, EmbridgeError};
use crate::handles::SparseEngineHandle;
use crate::marshal::{model_list_into_raw, sparse_into_raw, ModelEntryArray, SparseVecArray};
use crate::util::{borrow_str, collect_strings};

/// Model used when the caller passes a null model code.
const DEFAULT_MODEL: &str = "prithivida/Splade_PP_en_v1";

/// Create a sparse text embedding engine.
///
/// Returns a Ready handle, or null with one error written to `error` (when
/// non-null). Never both.
///
/// # Safety
/// `model_code` must be null or a valid NUL-terminated string; `error`
/// must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_sparse_engine_new(
    model_code: *const c_char,
    error: *mut *mut EmbridgeError,
) -> *mut SparseEngineHandle {
    let code = match borrow_str(model_code, "model code") {
        Ok(code) => code.unwrap_or(DEFAULT_MODEL),
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    match SparseTextEmbeddingEngine::new(code) {
        Ok(engine) => Box::into_raw(Box::new(SparseEngineHandle(Box::new(engine)))),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// Embed `num_texts` texts in `batch_size`-sized chunks.
///
/// Returns one (indices, values) pair per input in input order, or null
/// with one error written to `error` (when non-null).
///
/// # Safety
/// `handle` must be a live handle from `embridge_sparse_engine_new`;
/// `texts` must point to `num_texts` valid NUL-terminated strings; `error`
/// must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_sparse_engine_embed(
    handle: *mut SparseEngineHandle,
    texts: *const *const c_char,
    num_texts: usize,
    batch_size: usize,
    error: *mut *mut EmbridgeError,
) -> *mut SparseVecArray {
    if handle.is_null() {
        write_error(
            &embed_types::EngineError::InvalidArgument("null handle".to_string()),
            error,
        );
        return ptr::null_mut();
    }
    let engine = &(*handle).0;

    let texts = match collect_strings(texts, num_texts, "text") {
        Ok(texts) => texts,
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    debug!(model = %engine.info().code, count = num_texts, "Sparse embed call");

    match engine.embed(&texts, batch_size) {
        Ok(embeddings) => sparse_into_raw(embeddings),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// List supported sparse text embedding models.
///
/// The returned list is caller-owned; release with
/// `embridge_model_list_free`.
#[no_mangle]
pub extern "C" fn embridge_sparse_engine_list_models() -> *mut ModelEntryArray {
    model_list_into_raw(registry::list_infos(registry::sparse_models()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::slice;

    use embed_engine::backend::stub::StubSparseBackend;
    use embed_engine::EngineOptions;
    use embed_types::ModelInfo;

    use crate::error::embridge_error_free;
    use crate::handles::embridge_sparse_engine_free;
    use crate::marshal::embridge_sparse_result_free;

    fn stub_handle() -> *mut SparseEngineHandle {
        let engine = SparseTextEmbeddingEngine::from_backend(
            ModelInfo {
                code: "stub/sparse".to_string(),
                description: "stub".to_string(),
                dim: 30522,
            },
            Box::new(StubSparseBackend),
            &EngineOptions::default(),
        );
        Box::into_raw(Box::new(SparseEngineHandle(Box::new(engine))))
    }

    #[test]
    fn test_sparse_embed_index_value_parity() {
        let handle = stub_handle();
        let texts: Vec<CString> = ["one", "second", "x"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let ptrs: Vec<*const c_char> = texts.iter().map(|c| c.as_ptr()).collect();
        let mut error: *mut EmbridgeError = ptr::null_mut();

        let result =
            unsafe { embridge_sparse_engine_embed(handle, ptrs.as_ptr(), 3, 2, &mut error) };
        assert!(error.is_null());
        unsafe {
            assert_eq!((*result).len, 3);
            let vecs = slice::from_raw_parts((*result).vecs, (*result).len);
            for vec in vecs {
                // One len field tags both buffers
                assert!(!vec.indices.is_null());
                assert!(!vec.values.is_null());
                assert!(vec.len >= 1);
            }
            embridge_sparse_result_free(result);
            embridge_sparse_engine_free(handle);
        }
    }

    #[test]
    fn test_sparse_new_with_unknown_code_fails() {
        let code = CString::new("no/such-model").unwrap();
        let mut error: *mut EmbridgeError = ptr::null_mut();

        let handle = unsafe { embridge_sparse_engine_new(code.as_ptr(), &mut error) };
        assert!(handle.is_null());
        assert!(!error.is_null());
        unsafe { embridge_error_free(error) };
    }

    #[test]
    fn test_sparse_list_models() {
        let list = embridge_sparse_engine_list_models();
        unsafe {
            assert!((*list).len > 0);
            let entries = slice::from_raw_parts((*list).entries, (*list).len);
            for entry in entries {
                assert!(entry.dim > 0);
            }
            crate::marshal::embridge_model_list_free(list);
        }
    }
}
