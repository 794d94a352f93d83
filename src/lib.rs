//! Paged resizable memory buffers that grow without copying.
//!
//! A [`PagedBuffer`] is a resizable buffer of fixed-size elements that
//! is physically backed by independently allocated, fixed-size OS
//! memory pages but presented to callers as one contiguous, in-place
//! growable region. Growing the buffer only ever allocates new pages;
//! bytes already written are never reallocated, copied, or moved.
//!
//! The buffer is a strictly scope-bound resource: it borrows its
//! [`PageAllocator`] and [`HandlePool`] for its whole lifetime and
//! releases every page when dropped. Misuse such as use after release,
//! double release, or escaping the creating scope is ruled out by the
//! borrow checker instead of runtime checks.
//!
//! ```
//! use pagebuf::{HandlePool, PagedBuffer, SystemPageAllocator};
//!
//! # fn main() -> pagebuf::Result<()> {
//! let mut alloc = SystemPageAllocator::new();
//! let mut pool = HandlePool::default();
//! let mut buffer = PagedBuffer::<u64, _>::allocate(&mut alloc, &mut pool, 1024)?;
//! *buffer.get_mut(0)? = 42;
//! buffer.resize(100_000)?; // grows in place: element 0 never moves
//! assert_eq!(*buffer.get(0)?, 42);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod alloc;
pub mod buffer;
pub mod error;
pub mod handle;
pub mod pool;
pub mod registry;
pub mod segment;

pub use alloc::{
    PageAllocStats, PageAllocator, SystemPageAllocator, DEFAULT_PAGE_SIZE, MIN_PAGE_ALIGN,
};
pub use buffer::PagedBuffer;
pub use error::{PageBufError, Result};
pub use handle::PageHandle;
pub use pool::{HandlePool, DEFAULT_RETAINED_ARRAYS};
pub use registry::HandleRegistry;
pub use segment::{MemorySegment, Segments};
