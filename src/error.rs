//! Error taxonomy shared across the crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PageBufError>;

/// Errors surfaced by the paged buffer and its collaborators.
///
/// Contract violations (use after release, double release, escaping the
/// creating scope) have no variant here: they are ruled out by the
/// ownership model rather than detected at runtime.
#[derive(Debug, Error)]
pub enum PageBufError {
    /// The page allocator could not satisfy an allocation request.
    /// Propagated immediately; memory pressure is not retried.
    #[error("page allocator exhausted while requesting {0} bytes")]
    OutOfMemory(usize),
    /// Size arithmetic exceeded the platform's addressable range. Always
    /// detected before any page is touched.
    #[error("size arithmetic overflow in {0}")]
    Overflow(&'static str),
    /// A logical index at or beyond the buffer's used length.
    #[error("index {index} out of range (len {len})")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The buffer's used length at the time of the access.
        len: usize,
    },
    /// An element type or allocation size incompatible with page-granular
    /// placement.
    #[error("unsupported element layout: {0}")]
    InvalidLayout(&'static str),
}
