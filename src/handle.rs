//! Opaque handles to allocated pages.

use std::fmt;
use std::ptr::NonNull;
use std::slice;

/// Owned, opaque reference to one allocated page: a validated non-null
/// base address plus the page length in bytes.
///
/// A handle is move-only and immutable once created. It does not free
/// its memory on drop; the allocator that produced it is the sole
/// authority for the page's lifetime, and every handle must eventually
/// be passed back to [`PageAllocator::free`](crate::alloc::PageAllocator::free).
#[must_use]
pub struct PageHandle {
    base: NonNull<u8>,
    len: usize,
}

impl PageHandle {
    /// Builds a handle from a raw base pointer and length.
    ///
    /// # Safety
    ///
    /// `base` must point to `len` bytes of initialized, readable and
    /// writable memory that remains valid until the handle is released
    /// to the allocator that produced it, and that memory must not be
    /// accessed through any path other than this handle while it is
    /// live.
    pub unsafe fn from_raw_parts(base: NonNull<u8>, len: usize) -> Self {
        debug_assert!(len > 0, "zero-length page");
        Self { base, len }
    }

    /// Splits the handle back into its raw parts, giving up ownership.
    pub fn into_raw_parts(self) -> (NonNull<u8>, usize) {
        (self.base, self.len)
    }

    /// Page length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: the handle owns `len` initialized bytes at `base`, and
        // the borrow of `self` keeps the view from outliving it.
        unsafe { slice::from_raw_parts(self.base.as_ptr(), self.len) }
    }
}

impl fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHandle")
            .field("base", &self.base)
            .field("len", &self.len)
            .finish()
    }
}
