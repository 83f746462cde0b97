//! Row-parallel helpers for per-pixel passes
//!
//! Every pass in this crate writes disjoint output pixels from read-only
//! inputs, so rows can be processed independently. These helpers hide the
//! recurring pattern:
//! ```ignore
//! if parallel && num_pixels >= PARALLEL_THRESHOLD {
//!     data.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| { ... });
//! } else {
//!     for (y, row) in data.chunks_mut(row_len).enumerate() { ... }
//! }
//! ```
//! and add a cooperative cancellation check before each row.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{GradientError, Result};

/// Minimum pixel count before a pass is split across threads
pub const PARALLEL_THRESHOLD: usize = 100_000;

/// Shared flag used to stop a running pass between rows.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Rows already started run to completion.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[inline]
fn cancelled(cancel: Option<&CancelToken>) -> bool {
    cancel.is_some_and(CancelToken::is_cancelled)
}

/// Apply `f(y, row)` to every row of an interleaved buffer.
///
/// `row_len` is the number of values per row. Rows run on the rayon pool
/// when `parallel` is set and the buffer holds at least
/// [`PARALLEL_THRESHOLD`] pixels.
///
/// Returns [`GradientError::Cancelled`] if `cancel` fired before all rows
/// were visited; the buffer is then partially written.
pub fn for_each_row<F>(
    data: &mut [f32],
    row_len: usize,
    parallel: bool,
    cancel: Option<&CancelToken>,
    f: F,
) -> Result<()>
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    if row_len == 0 || data.is_empty() {
        return Ok(());
    }

    let num_pixels = data.len() / 3;

    if parallel && num_pixels >= PARALLEL_THRESHOLD {
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                if !cancelled(cancel) {
                    f(y, row);
                }
            });
    } else {
        for (y, row) in data.chunks_mut(row_len).enumerate() {
            if cancelled(cancel) {
                break;
            }
            f(y, row);
        }
    }

    if cancelled(cancel) {
        log::debug!("Pass cancelled");
        return Err(GradientError::Cancelled);
    }
    Ok(())
}

/// Parallel iteration over values with threshold-based dispatch.
pub fn for_each_value<F>(data: &mut [f32], parallel: bool, f: F)
where
    F: Fn(&mut f32) + Sync + Send,
{
    if parallel && data.len() / 3 >= PARALLEL_THRESHOLD {
        data.par_iter_mut().for_each(&f);
    } else {
        for value in data.iter_mut() {
            f(value);
        }
    }
}
