//! Reusable backing arrays for page-handle registries.
//!
//! Registries lease their handle arrays here instead of allocating
//! fresh ones, so a buffer that grows repeatedly does not churn the
//! heap. The pool is an explicit service handed to each registry, not a
//! process-wide singleton.

use tracing::trace;

use crate::handle::PageHandle;

/// Number of arrays a pool retains by default.
pub const DEFAULT_RETAINED_ARRAYS: usize = 4;

/// Checkout/check-in pool of `Vec<PageHandle>` backing arrays.
pub struct HandlePool {
    arrays: Vec<Vec<PageHandle>>,
    max_arrays: usize,
}

impl HandlePool {
    /// Creates a pool that retains at most `max_arrays` checked-in arrays.
    pub fn new(max_arrays: usize) -> Self {
        Self {
            arrays: Vec::with_capacity(max_arrays),
            max_arrays,
        }
    }

    /// Checks out an empty array with capacity of at least `min_capacity`.
    ///
    /// The returned array may be larger than requested; callers must use
    /// its actual capacity for bookkeeping, never the requested size.
    pub fn rent(&mut self, min_capacity: usize) -> Vec<PageHandle> {
        if let Some(pos) = self
            .arrays
            .iter()
            .position(|a| a.capacity() >= min_capacity)
        {
            let array = self.arrays.swap_remove(pos);
            trace!(capacity = array.capacity(), "handle_pool.rent.reuse");
            return array;
        }
        let capacity = min_capacity.next_power_of_two();
        trace!(capacity, "handle_pool.rent.fresh");
        Vec::with_capacity(capacity)
    }

    /// Checks an array back in for reuse.
    ///
    /// The array must no longer hold live handles. Arrays above the
    /// retention bound are dropped.
    pub fn give_back(&mut self, mut array: Vec<PageHandle>) {
        debug_assert!(
            array.is_empty(),
            "checked-in array still holds page handles"
        );
        array.clear();
        if self.arrays.len() < self.max_arrays {
            trace!(capacity = array.capacity(), "handle_pool.give_back");
            self.arrays.push(array);
        }
    }

    /// Number of arrays currently held for reuse.
    pub fn retained(&self) -> usize {
        self.arrays.len()
    }
}

impl Default for HandlePool {
    fn default() -> Self {
        Self::new(DEFAULT_RETAINED_ARRAYS)
    }
}
