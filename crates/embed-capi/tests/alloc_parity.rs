//! Allocation/free parity for nested result releases.
//!
//! A counting allocator wraps the system allocator; a marshal-then-release
//! cycle must leave allocation and deallocation counts in balance, proving
//! every inner buffer and outer array is freed exactly once. Kept as a
//! single test in its own binary so no concurrent test pollutes the
//! counters.

use std::alloc::{GlobalAlloc, Layout, System};
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use embed_engine::backend::stub::{StubDenseBackend, StubRerankBackend, StubSparseBackend};
use embed_engine::{
    EngineOptions, RerankEngine, SparseTextEmbeddingEngine, TextEmbeddingEngine,
};
use embed_types::ModelInfo;

use embridge::{
    embridge_dense_result_free, embridge_model_list_free, embridge_rerank_engine_free,
    embridge_rerank_engine_rerank, embridge_rerank_result_free, embridge_sparse_engine_embed,
    embridge_sparse_engine_free, embridge_sparse_result_free, embridge_text_engine_embed,
    embridge_text_engine_free, embridge_text_engine_list_models, EmbridgeError,
    RerankEngineHandle, SparseEngineHandle, TextEngineHandle,
};

struct CountingAllocator;

static ALLOCS: AtomicUsize = AtomicUsize::new(0);
static DEALLOCS: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCS.fetch_add(1, Ordering::SeqCst);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        DEALLOCS.fetch_add(1, Ordering::SeqCst);
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn counts() -> (usize, usize) {
    (ALLOCS.load(Ordering::SeqCst), DEALLOCS.load(Ordering::SeqCst))
}

fn stub_info(dim: usize) -> ModelInfo {
    ModelInfo {
        code: "stub/model".to_string(),
        description: "stub".to_string(),
        dim,
    }
}

fn with_c_strings(texts: &[&str], f: impl Fn(*const *const c_char, usize)) {
    let owned: Vec<CString> = texts.iter().map(|s| CString::new(*s).unwrap()).collect();
    let ptrs: Vec<*const c_char> = owned.iter().map(|c| c.as_ptr()).collect();
    f(ptrs.as_ptr(), ptrs.len());
}

/// One embed-then-release cycle per result kind must balance the
/// allocator, and every cycle is warmed up first so lazy one-time
/// allocations don't skew the counts.
#[test]
fn test_marshal_release_parity_all_result_kinds() {
    let text_handle = TextEngineHandle::new(TextEmbeddingEngine::from_backend(
        stub_info(64),
        Box::new(StubDenseBackend { dim: 64 }),
        &EngineOptions::default(),
    ))
    .into_raw();
    let sparse_handle = SparseEngineHandle::new(SparseTextEmbeddingEngine::from_backend(
        stub_info(30522),
        Box::new(StubSparseBackend),
        &EngineOptions::default(),
    ))
    .into_raw();
    let rerank_handle = RerankEngineHandle::new(RerankEngine::from_backend(
        stub_info(1),
        Box::new(StubRerankBackend),
        &EngineOptions::default(),
    ))
    .into_raw();

    let dense_cycle = || {
        with_c_strings(&["alpha", "beta", "gamma"], |ptrs, len| {
            let mut error: *mut EmbridgeError = ptr::null_mut();
            let result =
                unsafe { embridge_text_engine_embed(text_handle, ptrs, len, 2, &mut error) };
            assert!(error.is_null());
            unsafe { embridge_dense_result_free(result) };
        })
    };

    let sparse_cycle = || {
        with_c_strings(&["one", "two"], |ptrs, len| {
            let mut error: *mut EmbridgeError = ptr::null_mut();
            let result =
                unsafe { embridge_sparse_engine_embed(sparse_handle, ptrs, len, 1, &mut error) };
            assert!(error.is_null());
            unsafe { embridge_sparse_result_free(result) };
        })
    };

    let rerank_cycle = || {
        let query = CString::new("q").unwrap();
        with_c_strings(&["short", "a longer document"], |ptrs, len| {
            let mut error: *mut EmbridgeError = ptr::null_mut();
            let result = unsafe {
                embridge_rerank_engine_rerank(
                    rerank_handle,
                    query.as_ptr(),
                    ptrs,
                    len,
                    true,
                    8,
                    &mut error,
                )
            };
            assert!(error.is_null());
            unsafe { embridge_rerank_result_free(result) };
        })
    };

    let list_cycle = || {
        let list = embridge_text_engine_list_models();
        unsafe { embridge_model_list_free(list) };
    };

    let cycles: [(&str, &dyn Fn()); 4] = [
        ("dense", &dense_cycle),
        ("sparse", &sparse_cycle),
        ("rerank", &rerank_cycle),
        ("model list", &list_cycle),
    ];

    for (kind, cycle) in cycles {
        // Warm up any lazy one-time allocations on this path
        cycle();

        let (allocs_before, deallocs_before) = counts();
        cycle();
        let (allocs_after, deallocs_after) = counts();

        let allocated = allocs_after - allocs_before;
        let deallocated = deallocs_after - deallocs_before;
        assert!(allocated > 0, "{} cycle should allocate", kind);
        assert_eq!(
            allocated, deallocated,
            "{} cycle leaked or double-freed ({} allocs vs {} deallocs)",
            kind, allocated, deallocated
        );
    }

    unsafe {
        embridge_text_engine_free(text_handle);
        embridge_sparse_engine_free(sparse_handle);
        embridge_rerank_engine_free(rerank_handle);
    }
}
