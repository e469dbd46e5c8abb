//! Image embedding surface.

use std::os::raw::c_char;
use std::ptr;

use tracing::debug;

use embed_engine::ImageEmbeddingEngine;
use embed_models::registry;

use crate::error::{write_error, EmbridgeError};
use crate::handles::ImageEngineHandle;
use crate::marshal::{dense_into_raw, model_list_into_raw, DenseVecArray, ModelEntryArray};
use crate::util::{borrow_str, collect_strings};

/// Model used when the caller passes a null model code.
const DEFAULT_MODEL: &str = "openai/clip-vit-base-patch32";

/// Create an image embedding engine.
///
/// Returns a Ready handle, or null with one error written to `error` (when
/// non-null). Never both.
///
/// # Safety
/// `model_code` must be null or a valid NUL-terminated string; `error`
/// must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_image_engine_new(
    model_code: *const c_char,
    error: *mut *mut EmbridgeError,
) -> *mut ImageEngineHandle {
    let code = match borrow_str(model_code, "model code") {
        Ok(code) => code.unwrap_or(DEFAULT_MODEL),
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    match ImageEmbeddingEngine::new(code) {
        Ok(engine) => Box::into_raw(Box::new(ImageEngineHandle(Box::new(engine)))),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// Embed `num_images` image files in `batch_size`-sized chunks.
///
/// Returns one vector per path in input order, or null with one error
/// written to `error` (when non-null). An unreadable or undecodable file
/// fails the whole call.
///
/// # Safety
/// `handle` must be a live handle from `embridge_image_engine_new`;
/// `image_paths` must point to `num_images` valid NUL-terminated strings;
/// `error` must be null or a valid slot.
#[no_mangle]
pub unsafe extern "C" fn embridge_image_engine_embed(
    handle: *mut ImageEngineHandle,
    image_paths: *const *const c_char,
    num_images: usize,
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

    let paths = match collect_strings(image_paths, num_images, "path") {
        Ok(paths) => paths,
        Err(e) => {
            write_error(&e, error);
            return ptr::null_mut();
        }
    };

    debug!(model = %engine.info().code, count = num_images, "Image embed call");

    match engine.embed(&paths, batch_size) {
        Ok(embeddings) => dense_into_raw(embeddings),
        Err(e) => {
            write_error(&e, error);
            ptr::null_mut()
        }
    }
}

/// List supported image embedding models.
///
/// The returned list is caller-owned; release with
/// `embridge_model_list_free`.
#[no_mangle]
pub extern "C" fn embridge_image_engine_list_models() -> *mut ModelEntryArray {
    model_list_into_raw(registry::list_infos(registry::image_models()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::slice;

    use embed_engine::backend::stub::StubVisionBackend;
    use embed_engine::EngineOptions;
    use embed_types::ModelInfo;

    use crate::error::embridge_error_free;
    use crate::handles::embridge_image_engine_free;
    use crate::marshal::embridge_dense_result_free;

    fn stub_handle(dim: usize) -> *mut ImageEngineHandle {
        let engine = ImageEmbeddingEngine::from_backend(
            ModelInfo {
                code: "stub/vision".to_string(),
                description: "stub".to_string(),
                dim,
            },
            Box::new(StubVisionBackend { dim }),
            &EngineOptions::default(),
        );
        Box::into_raw(Box::new(ImageEngineHandle(Box::new(engine))))
    }

    #[test]
    fn test_image_embed_returns_one_vector_per_path() {
        let handle = stub_handle(512);
        let paths: Vec<CString> = ["a.png", "b.png"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let ptrs: Vec<*const c_char> = paths.iter().map(|c| c.as_ptr()).collect();
        let mut error: *mut EmbridgeError = ptr::null_mut();

        let result =
            unsafe { embridge_image_engine_embed(handle, ptrs.as_ptr(), 2, 1, &mut error) };
        assert!(error.is_null());
        unsafe {
            assert_eq!((*result).len, 2);
            let vecs = slice::from_raw_parts((*result).vecs, (*result).len);
            for vec in vecs {
                assert_eq!(vec.len, 512);
            }
            embridge_dense_result_free(result);
            embridge_image_engine_free(handle);
        }
    }

    #[test]
    fn test_image_new_with_unknown_code_fails() {
        let code = CString::new("no/such-model").unwrap();
        let mut error: *mut EmbridgeError = ptr::null_mut();

        let handle = unsafe { embridge_image_engine_new(code.as_ptr(), &mut error) };
        assert!(handle.is_null());
        assert!(!error.is_null());
        unsafe { embridge_error_free(error) };
    }

    #[test]
    fn test_image_list_models() {
        let list = embridge_image_engine_list_models();
        unsafe {
            assert!((*list).len > 0);
            crate::marshal::embridge_model_list_free(list);
        }
    }
}
