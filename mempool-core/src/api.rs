//! The API of mempool-core.

mod configuration;
mod description;
mod error;
mod lock;
mod platform;
mod pool;

pub use configuration::{Configuration, DefaultConfiguration};
pub use description::{Block, BlockInfo, MemoryInfo, PowerOf2, Region, Usage, UsageMap};
pub use error::Error;
pub use lock::{Lock, NoLock};
pub use platform::Platform;
pub use pool::Pool;

pub use crate::internals::BlockList;
