//! The errors of mempool-core.

use thiserror::Error as ThisError;

/// Error
///
/// The reasons for which an operation on a `Pool` may not be carried out.
///
/// Whichever the error, the pool is left exactly as it was prior to the call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ThisError)]
pub enum Error {
    /// An argument was rejected at the boundary: null address, zero size, or a size too large to be rounded.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Memory for the internal bookkeeping of the pool could not be obtained.
    #[error("could not allocate bookkeeping memory")]
    AllocationFailure,

    /// No free block is large enough for the request, once rounded up.
    ///
    /// This is an expected outcome, which the caller is expected to handle.
    #[error("no free block of at least {requested} bytes")]
    PoolExhausted {
        /// The size requested, rounded up to the alignment unit.
        requested: usize,
    },

    /// The address does not start any block currently in use.
    ///
    /// Either it was never handed out by this pool, or it was already released.
    #[error("no block in use starts at {address:#x}")]
    BlockNotFound {
        /// The address passed to `release`.
        address: usize,
    },
}
