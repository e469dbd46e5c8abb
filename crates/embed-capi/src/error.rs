//! Boundary error object.
//!
//! The internal [`EngineError`] taxonomy flattens to one heap-allocated,
//! message-carrying struct at the boundary; the variant survives as the
//! message prefix. Absence of an error (null) is the success signal.

use std::ffi::CString;
use std::os::raw::c_char;

use embed_types::EngineError;

/// Caller-owned error object. Release with [`embridge_error_free`].
#[repr(C)]
pub struct EmbridgeError {
    /// NUL-terminated human-readable message
    pub message: *mut c_char,
}

impl EmbridgeError {
    fn boxed(message: &str) -> *mut EmbridgeError {
        let c_str = CString::new(message).unwrap_or_default();
        Box::into_raw(Box::new(EmbridgeError {
            message: c_str.into_raw(),
        }))
    }
}

/// Write `err` into the caller's error slot, if one was supplied.
///
/// # Safety
/// `out` must be null or a valid pointer to an error slot.
pub(crate) unsafe fn write_error(err: &EngineError, out: *mut *mut EmbridgeError) {
    if !out.is_null() {
        *out = EmbridgeError::boxed(&err.to_string());
    }
}

/// Release an error object. Accepts null as a no-op.
///
/// # Safety
/// `error` must be null or a pointer previously written by a failing
/// `embridge_*` call, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_error_free(error: *mut EmbridgeError) {
    if !error.is_null() {
        let error = Box::from_raw(error);
        if !error.message.is_null() {
            let _ = CString::from_raw(error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    #[test]
    fn test_write_and_free_error() {
        let mut slot: *mut EmbridgeError = ptr::null_mut();
        let err = EngineError::InvalidArgument("batch_size must be >= 1".to_string());
        unsafe {
            write_error(&err, &mut slot);
            assert!(!slot.is_null());
            let message = CStr::from_ptr((*slot).message).to_str().unwrap();
            assert!(message.contains("batch_size"));
            assert!(message.starts_with("Invalid argument"));
            embridge_error_free(slot);
        }
    }

    #[test]
    fn test_null_slot_is_ignored() {
        let err = EngineError::UnsupportedModel("x".to_string());
        unsafe { write_error(&err, ptr::null_mut()) };
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { embridge_error_free(ptr::null_mut()) };
    }
}
