#![deny(missing_docs)]

//! A thread-safe fixed-region memory pool.
//!
//! The type `MemPool` hands out sub-ranges of a caller-supplied region, first-fit, and reclaims them with immediate
//! coalescing of free neighbours. It is `Send + Sync`, and is typically shared across threads behind an `Arc`.
//!
//! #   Warning
//!
//! The pool only tracks addresses: it never reads nor writes the memory it hands out, and does not guarantee any
//! alignment beyond the alignment unit of its `Configuration`.

mod lock;
mod platform;
mod pool;

pub use lock::MutexLock;
pub use pool::MemPool;

#[cfg(target_os = "linux")]
pub use platform::LinuxPlatform;

pub use mempool_core::{
    Block, BlockInfo, BlockList, Configuration, DefaultConfiguration, Error, MemoryInfo, Platform, PowerOf2, Region,
    Usage, UsageMap,
};
