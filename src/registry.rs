//! Append-only registry of the page handles backing one buffer.

use std::mem;

use tracing::trace;

use crate::error::{PageBufError, Result};
use crate::handle::PageHandle;
use crate::pool::HandlePool;

/// Ordered, append-only sequence of page handles, backed by an array
/// leased from a [`HandlePool`].
///
/// Entries are appended during growth and removed only on full release.
/// The leased array's capacity only grows over the registry's lifetime;
/// when the array is replaced, existing handles move to the replacement
/// in order and the old array goes back to the pool. The registry talks
/// to the pool only, never to the page allocator.
pub struct HandleRegistry<'p> {
    pool: &'p mut HandlePool,
    slots: Vec<PageHandle>,
}

impl<'p> HandleRegistry<'p> {
    /// Leases an initial backing array with room for at least
    /// `initial_capacity` handles.
    pub fn new(pool: &'p mut HandlePool, initial_capacity: usize) -> Self {
        let slots = pool.rent(initial_capacity);
        Self { pool, slots }
    }

    /// Makes room for `additional_pages` more handles, re-leasing the
    /// backing array if its capacity is insufficient.
    ///
    /// Capacity bookkeeping always uses the actual capacity of the array
    /// the pool returned, which may exceed the request.
    pub fn ensure_capacity(&mut self, additional_pages: usize) -> Result<()> {
        let needed = self
            .slots
            .len()
            .checked_add(additional_pages)
            .ok_or(PageBufError::Overflow("registry capacity"))?;
        if self.slots.capacity() >= needed {
            return Ok(());
        }
        let mut replacement = self.pool.rent(needed);
        debug_assert!(replacement.capacity() >= needed);
        // Move every handle across in append order.
        replacement.append(&mut self.slots);
        let old = mem::replace(&mut self.slots, replacement);
        self.pool.give_back(old);
        trace!(
            len = self.slots.len(),
            capacity = self.slots.capacity(),
            "registry.re_lease"
        );
        Ok(())
    }

    /// Appends a handle. Capacity must have been ensured beforehand.
    pub fn push(&mut self, handle: PageHandle) {
        debug_assert!(
            self.slots.len() < self.slots.capacity(),
            "push without ensure_capacity"
        );
        self.slots.push(handle);
    }

    /// Removes and returns the most recently appended handle.
    ///
    /// Only the owning buffer's release and growth-rollback paths remove
    /// entries; the registry never reorders what remains.
    pub fn pop(&mut self) -> Option<PageHandle> {
        self.slots.pop()
    }

    /// Handle at `index`, if one has been appended there.
    pub fn get(&self, index: usize) -> Option<&PageHandle> {
        self.slots.get(index)
    }

    /// Number of handles appended so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the registry holds no handles.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Capacity of the currently leased backing array.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn as_slice(&self) -> &[PageHandle] {
        &self.slots
    }
}

impl Drop for HandleRegistry<'_> {
    fn drop(&mut self) {
        debug_assert!(self.slots.is_empty(), "registry dropped with live handles");
        self.pool.give_back(mem::take(&mut self.slots));
    }
}
