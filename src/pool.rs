//! Fork/join executor used by the sort, build and range-search recursions.
//!
//! The source crate's own worker-pool primitive (`util::thread::Pool`) is a
//! long-lived, message-passing pool suited to gen-server style request/response
//! workers. It does not fit a recursion that forks at every level of a binary
//! split down to some bounded depth and then runs inline. `rayon::join` is
//! exactly that primitive, and `rayon` is already part of this crate's
//! dependency stack, so the pool here is a thin wrapper: a fixed-size
//! `rayon::ThreadPool` plus the `maxSubmitDepth` bookkeeping that decides,
//! at each recursion level, whether to fork through the pool or run inline.

use rayon::ThreadPool;

/// Wraps a fixed-size `rayon::ThreadPool` with the depth at which callers
/// should stop forking and run both halves of a recursion inline.
pub(crate) struct Pool {
    inner: Option<ThreadPool>,
    max_submit_depth: isize,
}

impl Pool {
    /// `n_threads <= 1` disables the pool entirely: `max_submit_depth` becomes
    /// `-1` and every recursion runs inline on the calling thread.
    ///
    /// For `n_threads >= 2`, `n_threads` is rounded down to a power of two and
    /// `max_submit_depth = floor(log2(n_threads - 1))`, so the "fork left, run
    /// right inline" pattern evenly consumes workers down to exactly the
    /// chosen depth.
    pub(crate) fn new(n_threads: usize) -> Pool {
        if n_threads <= 1 {
            return Pool {
                inner: None,
                max_submit_depth: -1,
            };
        }
        let pow2 = n_threads.next_power_of_two();
        let pow2 = if pow2 > n_threads { pow2 / 2 } else { pow2 };
        let pow2 = pow2.max(1);

        let max_submit_depth = ((pow2 - 1).max(1) as f64).log2().floor() as isize;

        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(pow2 - 1)
            .build()
            .ok();

        Pool {
            max_submit_depth: if inner.is_some() { max_submit_depth } else { -1 },
            inner,
        }
    }

    /// The greatest recursion depth at which forking is attempted.
    #[inline]
    pub(crate) fn max_submit_depth(&self) -> isize {
        self.max_submit_depth
    }

    /// True when `depth` is shallow enough that the caller should fork rather
    /// than run both halves inline.
    #[inline]
    pub(crate) fn should_fork(&self, depth: usize) -> bool {
        self.inner.is_some() && depth as isize <= self.max_submit_depth
    }

    /// Run `left` and `right` concurrently through the pool when `depth` is
    /// within `max_submit_depth`, otherwise run them inline, left then right.
    pub(crate) fn join<A, B, RA, RB>(&self, depth: usize, left: A, right: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        if self.should_fork(depth) {
            match &self.inner {
                Some(pool) => pool.join(left, right),
                None => (left(), right()),
            }
        } else {
            (left(), right())
        }
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
