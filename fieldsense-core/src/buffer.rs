//! Fixed-Capacity Sample Window for Rolling Statistics
//!
//! ## Overview
//!
//! The outlier transform compares each candidate reading against a
//! window of the previous `N` accepted values. That window is a classic
//! FIFO ring: pushing onto a full window overwrites the oldest value.
//!
//! ## Design Rationale
//!
//! The window size is a caller-supplied runtime parameter, so unlike a
//! const-generic buffer the capacity lives in the value. Storage is one
//! `Vec<f64>` allocated at construction; after that, every operation is
//! allocation-free:
//!
//! - `push()`: O(1), overwrites oldest when full
//! - `iter()`: O(n), oldest to newest
//! - `mean()`: O(n), no intermediate storage
//!
//! ```text
//! SampleWindow(5) after 7 pushes of 0..7:
//!
//! physical: [5, 6, 2, 3, 4]   write_pos = 2
//! logical:  [2, 3, 4, 5, 6]   (oldest → newest)
//! ```

use alloc::vec;
use alloc::vec::Vec;

/// FIFO ring buffer of `f64` samples with fixed runtime capacity
#[derive(Debug, Clone)]
pub struct SampleWindow {
    data: Vec<f64>,
    write_pos: usize,
    len: usize,
}

impl SampleWindow {
    /// Create an empty window holding at most `capacity` samples
    ///
    /// Panics if `capacity` is zero - a zero-width comparison window is
    /// a caller contract violation, not a recoverable condition.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "sample window capacity must be positive");
        Self {
            data: vec![0.0; capacity],
            write_pos: 0,
            len: 0,
        }
    }

    /// Maximum number of samples the window holds
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Current number of samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the window has reached capacity
    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Append a sample, overwriting the oldest when full
    pub fn push(&mut self, value: f64) {
        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % self.data.len();

        if self.len < self.data.len() {
            self.len += 1;
        }
    }

    /// Drop all samples, keeping the allocation
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Iterate samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let capacity = self.data.len();
        // When not yet full, data starts at 0; when full, at write_pos
        let start = if self.len < capacity { 0 } else { self.write_pos };
        (0..self.len).map(move |i| self.data[(start + i) % capacity])
    }

    /// Arithmetic mean of the current samples
    ///
    /// Returns 0.0 for an empty window; callers only take the mean of a
    /// full window.
    pub fn mean(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.iter().sum::<f64>() / self.len as f64
    }
}
