//! The internals of mempool-core.
//!
//! The internals provide all the heavy-lifting.

mod block_list;

pub use block_list::BlockList;
