//! Chunked batch execution with in-order reassembly.
//!
//! Partitions an input list into contiguous `batch_size`-sized chunks,
//! drives each chunk through the supplied executor closure, and reassembles
//! outputs in original input order. Execution is all-or-nothing: if any
//! chunk fails, the whole call fails with that chunk's error and no partial
//! results are surfaced.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::debug;

use embed_types::{EngineError, EngineResult};

/// Run `run_chunk` over contiguous chunks of `items` and collect outputs
/// in input order.
///
/// - `batch_size == 0` is rejected with [`EngineError::InvalidArgument`].
/// - An empty input yields an empty output without invoking `run_chunk`.
/// - With `workers > 1`, chunks execute on a pool of scoped threads; a
///   per-chunk slot buffer restores input order regardless of completion
///   order.
/// - A chunk whose output count differs from its input count is treated as
///   an executor failure.
pub fn run_batched<I, O, F>(
    items: &[I],
    batch_size: usize,
    workers: usize,
    run_chunk: F,
) -> EngineResult<Vec<O>>
where
    I: Sync,
    O: Send,
    F: Fn(&[I]) -> EngineResult<Vec<O>> + Sync,
{
    if batch_size == 0 {
        return Err(EngineError::InvalidArgument(
            "batch_size must be >= 1".to_string(),
        ));
    }
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let chunks: Vec<&[I]> = items.chunks(batch_size).collect();
    debug!(
        inputs = items.len(),
        batch_size,
        chunks = chunks.len(),
        "Scheduling batched run"
    );

    let checked = |chunk: &[I]| -> EngineResult<Vec<O>> {
        let out = run_chunk(chunk)?;
        if out.len() != chunk.len() {
            return Err(EngineError::Executor(format!(
                "chunk produced {} outputs for {} inputs",
                out.len(),
                chunk.len()
            )));
        }
        Ok(out)
    };

    if workers <= 1 || chunks.len() == 1 {
        let mut results = Vec::with_capacity(items.len());
        for chunk in chunks {
            results.extend(checked(chunk)?);
        }
        return Ok(results);
    }

    // Worker pool: threads pull chunk indices from a shared cursor and
    // deposit outputs into index-addressed slots. The slot buffer is the
    // only coordination structure; reassembly below is by chunk index.
    let cursor = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<EngineResult<Vec<O>>>>> = {
        let mut v = Vec::with_capacity(chunks.len());
        v.resize_with(chunks.len(), || None);
        Mutex::new(v)
    };

    std::thread::scope(|scope| {
        for _ in 0..workers.min(chunks.len()) {
            scope.spawn(|| loop {
                let idx = cursor.fetch_add(1, Ordering::SeqCst);
                if idx >= chunks.len() {
                    break;
                }
                let result = checked(chunks[idx]);
                let mut slots = slots.lock().unwrap_or_else(|e| e.into_inner());
                slots[idx] = Some(result);
            });
        }
    });

    let slots = slots.into_inner().unwrap_or_else(|e| e.into_inner());
    let mut results = Vec::with_capacity(items.len());
    for slot in slots {
        // Every slot is filled once the scope joins; report the
        // lowest-index failure and discard the rest.
        match slot {
            Some(Ok(out)) => results.extend(out),
            Some(Err(err)) => return Err(err),
            None => {
                return Err(EngineError::Executor(
                    "chunk result missing after worker join".to_string(),
                ))
            }
        }
    }
    Ok(results)
}

/// Number of chunks a batched run will execute.
pub fn chunk_count(n: usize, batch_size: usize) -> usize {
    n.div_ceil(batch_size)
}
