#![no_std]

#![deny(missing_docs)]

//! Building blocks for a fixed-region memory pool.
//!
//! mempool-core carves a caller-supplied region of memory into blocks, handed out with first-fit and reclaimed with
//! immediate coalescing of neighbours. It contains:
//! -   A `Pool` type, tracking the blocks of a single region.
//! -   A `Lock` trait, letting the user pick how the block list is protected: not at all, or by a mutex.
//! -   A `Configuration` trait, fixing the alignment unit at compile time.
//! -   A `Platform` trait, used by owners of pools to acquire the regions themselves.
//!
//! The pool only ever manages _addresses_; it never reads nor writes the memory of the region.

extern crate alloc;

mod api;
mod internals;
mod utils;

pub use api::*;
