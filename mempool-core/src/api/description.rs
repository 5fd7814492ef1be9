//! Descriptions of the region, its blocks, and its usage.

use alloc::vec::Vec;
use core::{fmt, ptr::NonNull};

use super::Error;

pub use crate::utils::PowerOf2;

/// Region
///
/// A contiguous range of memory, `[start, start + size)`, as handed to a `Pool`.
///
/// A Region is only a descriptor: it neither owns nor accesses the memory it describes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Region {
    start: NonNull<u8>,
    size: usize,
}

impl Region {
    /// Creates a new Region.
    ///
    /// Returns an error if `start` is null, if `size` is 0, or if the range would wrap around the address space.
    pub fn new(start: *mut u8, size: usize) -> Result<Region, Error> {
        let start = NonNull::new(start).ok_or(Error::InvalidArgument("null region start"))?;

        if size == 0 {
            return Err(Error::InvalidArgument("empty region"));
        }

        if (start.as_ptr() as usize).checked_add(size).is_none() {
            return Err(Error::InvalidArgument("region wraps around the address space"));
        }

        Ok(Region { start, size })
    }

    /// Returns the start of the region.
    pub fn start(&self) -> NonNull<u8> { self.start }

    /// Returns the size of the region, in bytes.
    pub fn size(&self) -> usize { self.size }

    /// Returns whether `address` lies within the region.
    pub fn contains(&self, address: NonNull<u8>) -> bool { self.offset_of(address).is_some() }

    //  Returns a copy of the region, shrunk to `size` bytes.
    pub(crate) fn truncate(&self, size: usize) -> Region {
        debug_assert!(size > 0 && size <= self.size, "{} not in (0, {}]", size, self.size);

        Region { start: self.start, size }
    }

    //  Returns the address located at `offset` bytes from the start.
    pub(crate) fn address_of(&self, offset: usize) -> NonNull<u8> {
        debug_assert!(offset < self.size, "{} >= {}", offset, self.size);

        //  Safety:
        //  -   `start + offset` does not wrap, as `offset < size` and `start + size` does not wrap.
        //  -   `start` is non-null, hence `start + offset` is non-null.
        unsafe { NonNull::new_unchecked(self.start.as_ptr().wrapping_add(offset)) }
    }

    //  Returns the offset of `address` from the start, if within the region.
    pub(crate) fn offset_of(&self, address: NonNull<u8>) -> Option<usize> {
        crate::utils::offset_from(self.start, address).filter(|offset| *offset < self.size)
    }
}

//  Safety:
//  -   A Region is a plain address range; the memory itself is never accessed through it.
unsafe impl Send for Region {}

//  Safety:
//  -   A Region is a plain address range; the memory itself is never accessed through it.
unsafe impl Sync for Region {}

/// Block
///
/// A contiguous sub-range of a region, either free or used.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Block {
    offset: usize,
    size: usize,
    used: bool,
}

impl Block {
    //  Creates a free block.
    pub(crate) fn free(offset: usize, size: usize) -> Block {
        debug_assert!(size > 0);

        Block { offset, size, used: false }
    }

    /// Returns the offset of the block from the start of the region.
    pub fn offset(&self) -> usize { self.offset }

    /// Returns the size of the block, in bytes.
    pub fn size(&self) -> usize { self.size }

    /// Returns the offset one past the end of the block.
    pub fn end(&self) -> usize { self.offset + self.size }

    /// Returns whether the block is in use.
    pub fn is_used(&self) -> bool { self.used }

    /// Returns whether the block is free.
    pub fn is_free(&self) -> bool { !self.used }

    pub(crate) fn set_used(&mut self, used: bool) { self.used = used; }

    pub(crate) fn set_size(&mut self, size: usize) {
        debug_assert!(size > 0);

        self.size = size;
    }
}

/// BlockInfo
///
/// The address and size of a block, as reported by `Pool::used_blocks` and `Pool::free_blocks`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BlockInfo {
    /// Start of the block.
    pub address: NonNull<u8>,
    /// Size of the block, in bytes.
    pub size: usize,
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Start: {:p}, Size: {}", self.address, self.size)
    }
}

/// MemoryInfo
///
/// The overall occupation of a pool.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct MemoryInfo {
    /// Size of the managed region, in bytes.
    pub total: usize,
    /// Number of bytes not currently handed out.
    pub free: usize,
}

impl MemoryInfo {
    /// Returns the number of bytes currently handed out.
    pub fn used(&self) -> usize { self.total - self.free }
}

/// Usage
///
/// The state of one alignment unit of a region.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Usage {
    /// Not handed out.
    Free,
    /// Handed out.
    Used,
}

impl Usage {
    /// Returns the symbol used to display this state.
    pub fn symbol(&self) -> char {
        match self {
            Usage::Free => '.',
            Usage::Used => '#',
        }
    }
}

impl From<bool> for Usage {
    fn from(used: bool) -> Usage { if used { Usage::Used } else { Usage::Free } }
}

/// UsageMap
///
/// The state of each alignment unit of a region, in address order.
///
/// Displayed as one symbol per unit, `.` for free and `#` for used, wrapped every `line_width` symbols.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UsageMap {
    units: Vec<Usage>,
    line_width: usize,
}

impl UsageMap {
    pub(crate) fn new(units: Vec<Usage>, line_width: usize) -> UsageMap {
        debug_assert!(line_width > 0);

        UsageMap { units, line_width }
    }

    /// Returns the state of each unit, in address order.
    pub fn units(&self) -> &[Usage] { &self.units }

    /// Returns the number of units.
    pub fn len(&self) -> usize { self.units.len() }

    /// Returns whether there are no units.
    pub fn is_empty(&self) -> bool { self.units.is_empty() }

    /// Returns the number of units used.
    pub fn used(&self) -> usize { self.units.iter().filter(|u| **u == Usage::Used).count() }
}

impl fmt::Display for UsageMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.units.chunks(self.line_width).enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }

            for unit in line {
                write!(f, "{}", unit.symbol())?;
            }
        }

        Ok(())
    }
}
