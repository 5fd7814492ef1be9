//! The list of blocks tiling a region.
//!
//! The blocks are kept in a vector, sorted by offset, which at all times exactly tiles `[0, size)`:
//!
//! -   The first block starts at offset 0.
//! -   Each block starts where the previous one ends.
//! -   The last block ends at `size`.
//!
//! Additionally, no two adjacent blocks are ever both free: coalescing is performed eagerly on every release.
//!
//! Splitting a block is an insertion right after it, and merging two blocks a removal, so that no block ever refers
//! to another.

use alloc::vec::Vec;
use core::slice;

use crate::{Block, Error};

/// BlockList
///
/// The ordered blocks of a region, each free or used.
#[derive(Clone, Debug)]
pub struct BlockList {
    blocks: Vec<Block>,
    size: usize,
}

impl BlockList {
    /// Creates a list of a single free block spanning `size` bytes.
    pub(crate) fn new(size: usize) -> Result<BlockList, Error> {
        debug_assert!(size > 0);

        let mut blocks = Vec::new();
        blocks.try_reserve(1).map_err(|_| Error::AllocationFailure)?;
        blocks.push(Block::free(0, size));

        Ok(BlockList { blocks, size })
    }

    /// Returns the total size covered by the blocks.
    pub fn size(&self) -> usize { self.size }

    /// Returns the number of blocks, free and used.
    pub fn count(&self) -> usize { self.blocks.len() }

    /// Returns an iterator over the blocks, in offset order.
    pub fn iter(&self) -> slice::Iter<'_, Block> { self.blocks.iter() }

    /// Returns the number of bytes in used blocks.
    pub fn used_size(&self) -> usize { self.iter().filter(|b| b.is_used()).map(Block::size).sum() }

    /// Hands out the first free block of at least `size` bytes, returning its offset.
    ///
    /// If the block is larger than necessary, it is split and the remainder is left free right after it.
    ///
    /// `size` is assumed to be non-zero and already rounded up to the alignment unit.
    pub(crate) fn allocate(&mut self, size: usize) -> Result<usize, Error> {
        debug_assert!(size > 0);

        let index = self.blocks.iter()
            .position(|b| b.is_free() && b.size() >= size)
            .ok_or(Error::PoolExhausted { requested: size })?;

        let block = self.blocks[index];

        if block.size() > size {
            //  Reserve first, so that failing leaves the list untouched.
            self.blocks.try_reserve(1).map_err(|_| Error::AllocationFailure)?;

            let remainder = Block::free(block.offset() + size, block.size() - size);

            self.blocks[index].set_size(size);
            self.blocks.insert(index + 1, remainder);
        }

        self.blocks[index].set_used(true);

        Ok(block.offset())
    }

    /// Releases the used block starting at `offset`, returning its size.
    ///
    /// Returns None, and leaves the list untouched, if no used block starts at `offset`.
    pub(crate) fn release(&mut self, offset: usize) -> Option<usize> {
        let index = self.blocks.binary_search_by_key(&offset, Block::offset).ok()?;

        let block = &mut self.blocks[index];

        if block.is_free() {
            return None;
        }

        let size = block.size();
        block.set_used(false);

        self.coalesce(index);

        Some(size)
    }

    //  Merges the free block at `index` with its free neighbours, if any.
    fn coalesce(&mut self, index: usize) {
        debug_assert!(self.blocks[index].is_free());

        if let Some(next) = self.blocks.get(index + 1).copied().filter(Block::is_free) {
            let size = self.blocks[index].size() + next.size();

            self.blocks[index].set_size(size);
            self.blocks.remove(index + 1);
        }

        if index > 0 && self.blocks[index - 1].is_free() {
            let size = self.blocks[index - 1].size() + self.blocks[index].size();

            self.blocks[index - 1].set_size(size);
            self.blocks.remove(index);
        }
    }
}
