//! Request batching
//!
//! The graph server rejects statements whose `IN [...]` lists grow too long.
//! Every bulk fetch therefore goes through [`batched`], which splits the key
//! list into fixed-size ordered chunks, calls the underlying fetch once per
//! chunk, and concatenates the per-chunk results in chunk order.

use tracing::debug;

/// Default number of keys sent to the server in one request.
pub const DEFAULT_CHUNK_SIZE: usize = 2500;

/// Split `items` into ordered slices of at most `size` elements.
///
/// A `size` of zero is treated as one so the iterator always makes progress.
pub fn chunks<T>(items: &[T], size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.max(1))
}

/// Call `fetch` once per chunk of `keys` and concatenate the results.
///
/// Chunks are issued sequentially and in order, so the output order is the
/// order `fetch` would produce for the whole list when `fetch` itself is
/// chunk-size agnostic. The first failing chunk aborts the whole call; no
/// partial result is returned and nothing is retried.
pub fn batched<K, T, E, F>(keys: &[K], chunk_size: usize, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(&[K]) -> Result<Vec<T>, E>,
{
    let total = keys.len().div_ceil(chunk_size.max(1));
    let mut out = Vec::new();
    for (i, chunk) in chunks(keys, chunk_size).enumerate() {
        debug!(chunk = i + 1, of = total, size = chunk.len(), "fetching chunk");
        out.extend(fetch(chunk)?);
    }
    Ok(out)
}
