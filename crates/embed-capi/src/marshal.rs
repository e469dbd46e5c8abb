//! Result marshaling: native result shapes to flat, length-tagged arrays.
//!
//! Each result kind is an outer descriptor array plus independently
//! allocated inner buffers. Marshaling allocates inner buffers first, then
//! the outer array, then the boxed top-level struct; each kind's single
//! release function walks the reverse order. No release function traverses
//! a shape it was not built for.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use embed_types::{Embedding, ModelInfo, RerankResult, SparseEmbedding};

use crate::util::to_cstring;

// ========== Dense ==========

/// One dense vector.
#[repr(C)]
pub struct DenseVec {
    pub data: *mut f32,
    pub len: usize,
}

/// Dense embedding result: one vector per input, input order.
/// Release with [`embridge_dense_result_free`].
#[repr(C)]
pub struct DenseVecArray {
    pub vecs: *mut DenseVec,
    pub len: usize,
}

/// Leak a vector as a length-exact raw buffer.
///
/// Boxing first guarantees capacity equals length, which the release walk
/// relies on when it rebuilds the vector to drop it.
fn leak_exact<T>(items: Vec<T>) -> (*mut T, usize) {
    let mut boxed = items.into_boxed_slice();
    let len = boxed.len();
    let ptr = boxed.as_mut_ptr();
    std::mem::forget(boxed);
    (ptr, len)
}

pub(crate) fn dense_into_raw(embeddings: Vec<Embedding>) -> *mut DenseVecArray {
    let vecs: Vec<DenseVec> = embeddings
        .into_iter()
        .map(|emb| {
            let (data, len) = leak_exact(emb.values);
            DenseVec { data, len }
        })
        .collect();

    let (vecs, len) = leak_exact(vecs);
    Box::into_raw(Box::new(DenseVecArray { vecs, len }))
}

/// Release a dense result: inner vectors first, then the outer array.
/// Accepts null as a no-op.
///
/// # Safety
/// `result` must be null or a pointer returned by an embed call, not yet
/// freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_dense_result_free(result: *mut DenseVecArray) {
    if !result.is_null() {
        let result = Box::from_raw(result);
        let vecs = Vec::from_raw_parts(result.vecs, result.len, result.len);
        for vec in vecs {
            if !vec.data.is_null() {
                let _ = Vec::from_raw_parts(vec.data, vec.len, vec.len);
            }
        }
    }
}

// ========== Sparse ==========

/// One sparse vector: parallel index/value buffers of equal length.
#[repr(C)]
pub struct SparseVec {
    pub indices: *mut usize,
    pub values: *mut f32,
    pub len: usize,
}

/// Sparse embedding result: one entry per input, input order.
/// Release with [`embridge_sparse_result_free`].
#[repr(C)]
pub struct SparseVecArray {
    pub vecs: *mut SparseVec,
    pub len: usize,
}

pub(crate) fn sparse_into_raw(embeddings: Vec<SparseEmbedding>) -> *mut SparseVecArray {
    let vecs: Vec<SparseVec> = embeddings
        .into_iter()
        .map(|emb| {
            let (indices, len) = leak_exact(emb.indices);
            let (values, _) = leak_exact(emb.values);
            SparseVec {
                indices,
                values,
                len,
            }
        })
        .collect();

    let (vecs, len) = leak_exact(vecs);
    Box::into_raw(Box::new(SparseVecArray { vecs, len }))
}

/// Release a sparse result: index and value buffers first, then the outer
/// array. Accepts null as a no-op.
///
/// # Safety
/// `result` must be null or a pointer returned by a sparse embed call, not
/// yet freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_sparse_result_free(result: *mut SparseVecArray) {
    if !result.is_null() {
        let result = Box::from_raw(result);
        let vecs = Vec::from_raw_parts(result.vecs, result.len, result.len);
        for vec in vecs {
            if !vec.indices.is_null() {
                let _ = Vec::from_raw_parts(vec.indices, vec.len, vec.len);
            }
            if !vec.values.is_null() {
                let _ = Vec::from_raw_parts(vec.values, vec.len, vec.len);
            }
        }
    }
}

// ========== Rerank ==========

/// One scored document. `document` is null unless echoing was requested.
#[repr(C)]
pub struct RerankEntry {
    pub index: usize,
    pub score: f32,
    pub document: *mut c_char,
}

/// Rerank result, sorted by descending score.
/// Release with [`embridge_rerank_result_free`].
#[repr(C)]
pub struct RerankEntryArray {
    pub entries: *mut RerankEntry,
    pub len: usize,
}

pub(crate) fn rerank_into_raw(results: Vec<RerankResult>) -> *mut RerankEntryArray {
    let entries: Vec<RerankEntry> = results
        .into_iter()
        .map(|r| RerankEntry {
            index: r.index,
            score: r.score,
            document: r
                .document
                .map(|d| to_cstring(&d).into_raw())
                .unwrap_or(ptr::null_mut()),
        })
        .collect();

    let (entries, len) = leak_exact(entries);
    Box::into_raw(Box::new(RerankEntryArray { entries, len }))
}

/// Release a rerank result: echoed documents first, then the entry array.
/// Accepts null as a no-op.
///
/// # Safety
/// `result` must be null or a pointer returned by a rerank call, not yet
/// freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_rerank_result_free(result: *mut RerankEntryArray) {
    if !result.is_null() {
        let result = Box::from_raw(result);
        let entries = Vec::from_raw_parts(result.entries, result.len, result.len);
        for entry in entries {
            if !entry.document.is_null() {
                let _ = CString::from_raw(entry.document);
            }
        }
    }
}

// ========== Model listing ==========

/// One model catalog entry; both strings are caller-owned duplicates.
#[repr(C)]
pub struct ModelEntry {
    pub code: *mut c_char,
    pub description: *mut c_char,
    pub dim: usize,
}

/// Model listing result. Release with [`embridge_model_list_free`].
#[repr(C)]
pub struct ModelEntryArray {
    pub entries: *mut ModelEntry,
    pub len: usize,
}

pub(crate) fn model_list_into_raw(infos: Vec<ModelInfo>) -> *mut ModelEntryArray {
    let entries: Vec<ModelEntry> = infos
        .into_iter()
        .map(|info| ModelEntry {
            code: to_cstring(&info.code).into_raw(),
            description: to_cstring(&info.description).into_raw(),
            dim: info.dim,
        })
        .collect();

    let (entries, len) = leak_exact(entries);
    Box::into_raw(Box::new(ModelEntryArray { entries, len }))
}

/// Release a model listing: code/description strings first, then the entry
/// array. Accepts null as a no-op.
///
/// # Safety
/// `list` must be null or a pointer returned by a list-models call, not yet
/// freed.
#[no_mangle]
pub unsafe extern "C" fn embridge_model_list_free(list: *mut ModelEntryArray) {
    if !list.is_null() {
        let list = Box::from_raw(list);
        let entries = Vec::from_raw_parts(list.entries, list.len, list.len);
        for entry in entries {
            if !entry.code.is_null() {
                let _ = CString::from_raw(entry.code);
            }
            if !entry.description.is_null() {
                let _ = CString::from_raw(entry.description);
            }
        }
    }
}
