//! Construction-time configuration, following the builder-with-defaults
//! pattern used for this crate's on-disk cousins: start from `Config::new`,
//! chain `set_*` methods, hand the finished value to the facade.

/// Tunables for a [`crate::Tree`][super::Tree].
///
/// `dimensions` is fixed at construction and never changes. The remaining
/// fields have defaults tuned for the common case and are only worth
/// touching under unusual load: a very large `dimensions`, a staging
/// buffer sized far outside the default, or a build running on a box
/// whose core count `num_cpus` can't see (e.g. a cgroup-limited
/// container).
#[derive(Debug, Clone)]
pub struct Config {
    dimensions: usize,
    capacity: usize,
    num_threads: usize,
}

impl Config {
    /// `dimensions` is the number of axes every point must carry.
    /// `capacity` bounds the staging buffer; `add` past it fails with
    /// `Error::CapacityExceeded`. `num_threads` defaults to the host's
    /// logical core count.
    pub fn new(dimensions: usize, capacity: usize) -> Config {
        Config {
            dimensions,
            capacity,
            num_threads: num_cpus::get(),
        }
    }

    /// Override the thread count used by the fork/join executor. `0` and
    /// `1` both mean "run single-threaded, never fork".
    pub fn set_num_threads(&mut self, num_threads: usize) -> &mut Self {
        self.num_threads = num_threads;
        self
    }

    pub(crate) fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn num_threads(&self) -> usize {
        self.num_threads
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
