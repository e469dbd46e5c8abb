//! Dense text embedding surface.

use std::os::raw::c_char;
use std::ptr;

use tracing::debug;

use embed_engine::TextEmbeddingEngine;
use embed_models::registry;

use crate::error::{write_error, EmbridgeError};
use crate::handles::TextEngineHandle;
use crate::marshal::{dense_into_raw, model_list_into_raw, DenseVecArray, ModelEntryArray};
use crate::util::{borrow_str, collect_strings};

/// Model used when the caller passes a null model code.
const DEFAULT_MODEL: &str = "BAAI/bge-small-en-v1.5";

/// Create a dense text embedding engine.
///
/// Returns a Ready handle, or null with one error written to `error` (when
/// non-null). Never both.
///
/// # Safety
/// `model_code` must be null or a valid NUL-terminated string; `error`
/// must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_text_engine_new(
    model_code: *const c_char,
    error: *mut *mut EmbridgeError,
) -> *mut TextEngineHandle {
    let code = match borrow_str(model_code, "model code") {
        Ok(code) => code.unwrap_or(DEFAULT_MODEL),
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    match TextEmbeddingEngine::new(code) {
        Ok(engine) => Box::into_raw(Box::new(TextEngineHandle(Box::new(engine)))),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// Embed `num_texts` texts in `batch_size`-sized chunks.
///
/// Returns one vector per input in input order, or null with one error
/// written to `error` (when non-null). `batch_size` of zero is rejected;
/// zero texts is a valid request yielding an empty result.
///
/// # Safety
/// `handle` must be a live handle from `embridge_text_engine_new`;
/// `texts` must point to `num_texts` valid NUL-terminated strings; `error`
/// must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_text_engine_embed(
    handle: *mut TextEngineHandle,
    texts: *const *const c_char,
    num_texts: usize,
    batch_size: usize,
    error: *mut *mut EmbridgeError,
) -> *mut DenseVecArray {
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

    debug!(model = %engine.info().code, count = num_texts, "Text embed call");

    match engine.embed(&texts, batch_size) {
        Ok(embeddings) => dense_into_raw(embeddings),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// List supported dense text embedding models.
///
/// The returned list is caller-owned; release with
/// `embridge_model_list_free`.
#[no_mangle]
pub extern "C" fn embridge_text_engine_list_models() -> *mut ModelEntryArray {
    model_list_into_raw(registry::list_infos(registry::dense_models()))
}
