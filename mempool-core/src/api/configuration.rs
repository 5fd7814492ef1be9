//! The configuration of mempool-core.
//!
//! A Configuration is selected at compile-time, as a type parameter of `Pool`, and fixes the granularity at which the
//! region is carved.

use super::PowerOf2;

/// Configuration
///
/// The Configuration instance allows adjusting the granularity of the blocks.
pub trait Configuration {
    /// The alignment unit of the blocks.
    ///
    /// The size of every block is a multiple of this unit, and so is the offset of every block from the start of the
    /// region. Requests are rounded up to a multiple of this unit.
    const ALIGNMENT: PowerOf2;

    /// The number of symbols per line, when displaying a `UsageMap`.
    const USAGE_LINE_WIDTH: usize;
}

/// The default configuration: blocks are multiple of 4 bytes, and usage maps are displayed 256 symbols per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfiguration;

impl Configuration for DefaultConfiguration {
    //  Safety:
    //  -   4 is a power of 2.
    const ALIGNMENT: PowerOf2 = unsafe { PowerOf2::new_unchecked(4) };

    const USAGE_LINE_WIDTH: usize = 256;
}
