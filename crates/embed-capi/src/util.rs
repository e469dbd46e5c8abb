//! Borrowed-string conversions for caller input.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::slice;

use embed_types::{EngineError, EngineResult};

/// Borrow a caller string for the duration of the call.
///
/// # Safety
/// `ptr` must be null or a valid NUL-terminated string.
pub(crate) unsafe fn borrow_str<'a>(
    ptr: *const c_char,
    what: &str,
) -> EngineResult<Option<&'a str>> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(Some)
        .map_err(|e| EngineError::InvalidArgument(format!("invalid UTF-8 in {}: {}", what, e)))
}

/// Copy a caller string array into owned Rust strings.
///
/// Null array or null elements are rejected as invalid arguments.
///
/// # Safety
/// `ptr` must be null or point to `len` valid NUL-terminated strings.
pub(crate) unsafe fn collect_strings(
    ptr: *const *const c_char,
    len: usize,
    what: &str,
) -> EngineResult<Vec<String>> {
    if ptr.is_null() {
        if len == 0 {
            // An empty input list is a valid request
            return Ok(Vec::new());
        }
        return Err(EngineError::InvalidArgument(format!(
            "null {} array",
            what
        )));
    }

    let slots = slice::from_raw_parts(ptr, len);
    let mut out = Vec::with_capacity(len);
    for &slot in slots {
        if slot.is_null() {
            return Err(EngineError::InvalidArgument(format!(
                "null {} pointer in array",
                what
            )));
        }
        let s = CStr::from_ptr(slot).to_str().map_err(|e| {
            EngineError::InvalidArgument(format!("invalid UTF-8 in {}: {}", what, e))
        })?;
        out.push(s.to_string());
    }
    Ok(out)
}

/// Duplicate an output string for the caller; interior NULs are dropped.
pub(crate) fn to_cstring(s: &str) -> CString {
    CString::new(s)
        .or_else(|_| CString::new(s.replace('\0', "")))
        .unwrap_or_default()
}
