//! OS page allocation.
//!
//! [`PageAllocator`] is the boundary to the operating system's page
//! allocator. [`SystemPageAllocator`] is the production implementation:
//! anonymous `mmap` on Unix, page-aligned heap allocation elsewhere.

use tracing::debug;

use crate::error::{PageBufError, Result};
use crate::handle::PageHandle;

/// Default page size in bytes.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Minimum base-address alignment every implementation must provide,
/// whatever its configured page size.
pub const MIN_PAGE_ALIGN: usize = 4096;

/// Fixed-size page allocation service.
///
/// Allocation sizes must always be a multiple of
/// [`page_size`](Self::page_size). Implementations must hand out
/// zero-initialized memory aligned to at least [`MIN_PAGE_ALIGN`]; the
/// buffer relies on every byte of an allocated page being initialized.
pub trait PageAllocator {
    /// The fixed page size in bytes. Constant for the allocator's lifetime.
    fn page_size(&self) -> usize;

    /// Allocates `size` bytes (a multiple of the page size) and returns an
    /// owning handle, or [`PageBufError::OutOfMemory`] on exhaustion.
    fn allocate(&mut self, size: usize) -> Result<PageHandle>;

    /// Releases a handle previously returned by [`allocate`](Self::allocate).
    fn free(&mut self, handle: PageHandle);
}

/// Allocation counters for a [`SystemPageAllocator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageAllocStats {
    /// Pages currently allocated and not yet freed.
    pub outstanding_pages: u64,
    /// Total pages handed out over the allocator's lifetime.
    pub total_allocated: u64,
    /// Total pages released over the allocator's lifetime.
    pub total_freed: u64,
}

/// Production allocator backed by the operating system.
///
/// Pages come back zero-filled. The stats snapshot is the intended tool
/// for leak triage: after every buffer in a scope has been released,
/// `outstanding_pages` must be back where it started.
pub struct SystemPageAllocator {
    page_size: usize,
    stats: PageAllocStats,
}

impl SystemPageAllocator {
    /// Creates an allocator with [`DEFAULT_PAGE_SIZE`] pages.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates an allocator with a custom page size.
    ///
    /// The page size must be a non-zero power of two.
    pub fn with_page_size(page_size: usize) -> Self {
        assert!(
            page_size.is_power_of_two(),
            "page size must be a power of two"
        );
        Self {
            page_size,
            stats: PageAllocStats::default(),
        }
    }

    /// Snapshot of the allocation counters.
    pub fn stats(&self) -> PageAllocStats {
        self.stats
    }
}

impl Default for SystemPageAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAllocator for SystemPageAllocator {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn allocate(&mut self, size: usize) -> Result<PageHandle> {
        if size == 0 || size % self.page_size != 0 {
            return Err(PageBufError::InvalidLayout(
                "allocation size is not a multiple of the page size",
            ));
        }
        let base = os::alloc(size, self.page_size)?;
        let pages = (size / self.page_size) as u64;
        self.stats.outstanding_pages += pages;
        self.stats.total_allocated += pages;
        debug!(
            size,
            outstanding = self.stats.outstanding_pages,
            "page_alloc.allocate"
        );
        // SAFETY: `base` points to `size` zeroed bytes freshly mapped for
        // this handle alone.
        Ok(unsafe { PageHandle::from_raw_parts(base, size) })
    }

    fn free(&mut self, handle: PageHandle) {
        let (base, len) = handle.into_raw_parts();
        let pages = (len / self.page_size) as u64;
        // SAFETY: the handle was produced by `allocate` with this length.
        unsafe { os::free(base, len, self.page_size) };
        self.stats.outstanding_pages = self.stats.outstanding_pages.saturating_sub(pages);
        self.stats.total_freed += pages;
        debug!(
            len,
            outstanding = self.stats.outstanding_pages,
            "page_alloc.free"
        );
    }
}

#[cfg(unix)]
mod os {
    use std::ptr::NonNull;

    use crate::error::{PageBufError, Result};

    pub fn alloc(size: usize, _page_size: usize) -> Result<NonNull<u8>> {
        // SAFETY: anonymous private mapping; no fd, no offset.
        let raw = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(PageBufError::OutOfMemory(size));
        }
        NonNull::new(raw.cast::<u8>()).ok_or(PageBufError::OutOfMemory(size))
    }

    /// # Safety
    ///
    /// `base` and `size` must come from a successful [`alloc`].
    pub unsafe fn free(base: NonNull<u8>, size: usize, _page_size: usize) {
        let rc = libc::munmap(base.as_ptr().cast(), size);
        debug_assert_eq!(rc, 0, "munmap failed");
    }
}

#[cfg(not(unix))]
mod os {
    use std::alloc::{alloc_zeroed, dealloc, Layout};
    use std::ptr::NonNull;

    use crate::error::{PageBufError, Result};

    use super::MIN_PAGE_ALIGN;

    fn layout_for(size: usize, page_size: usize) -> Result<Layout> {
        Layout::from_size_align(size, page_size.max(MIN_PAGE_ALIGN))
            .map_err(|_| PageBufError::Overflow("page allocation layout"))
    }

    pub fn alloc(size: usize, page_size: usize) -> Result<NonNull<u8>> {
        let layout = layout_for(size, page_size)?;
        // SAFETY: `layout` has non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        NonNull::new(raw).ok_or(PageBufError::OutOfMemory(size))
    }

    /// # Safety
    ///
    /// `base` and `size` must come from a successful [`alloc`] with the
    /// same `page_size`.
    pub unsafe fn free(base: NonNull<u8>, size: usize, page_size: usize) {
        let layout = Layout::from_size_align_unchecked(size, page_size.max(MIN_PAGE_ALIGN));
        dealloc(base.as_ptr(), layout);
    }
}
