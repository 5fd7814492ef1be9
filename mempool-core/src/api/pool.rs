//! Pool
//!
//! A Pool carves up a single region into blocks, handed out first-fit.
//!
//! Every operation, observations included, is carried out under the lock of the pool, which is held for the full
//! duration of the operation. The observable behavior of a pool shared across threads is therefore linearizable.

use alloc::vec::Vec;
use core::{marker, ptr::NonNull};

use super::{Block, BlockInfo, Configuration, Error, Lock, MemoryInfo, Region, Usage, UsageMap};
use crate::internals::BlockList;

/// Pool
///
/// A fixed region of memory, and the blocks it is carved into.
///
/// `C` fixes the alignment unit, and `L` the lock protecting the blocks: `NoLock` for a single-threaded pool, or a
/// mutex for a pool shared across threads.
pub struct Pool<C, L> {
    region: Region,
    blocks: L,
    _configuration: marker::PhantomData<fn() -> C>,
}

impl<C, L> Pool<C, L>
    where
        C: Configuration,
        L: Lock<BlockList>,
{
    /// Creates a pool managing the `size` bytes starting at `start`.
    ///
    /// Only the largest multiple of the alignment unit not exceeding `size` is managed.
    ///
    /// Returns an error if `start` is null, if fewer bytes than the alignment unit are supplied, or if the memory for
    /// the bookkeeping cannot be obtained.
    ///
    /// The pool never reads nor writes the memory of the region: it is up to the caller to ensure that the region is
    /// valid for as long as the addresses handed out by the pool are used.
    pub fn new(start: *mut u8, size: usize) -> Result<Self, Error> {
        let region = Region::new(start, size)?;

        let size = C::ALIGNMENT.round_down(region.size());

        if size == 0 {
            return Err(Error::InvalidArgument("region smaller than the alignment unit"));
        }

        let region = region.truncate(size);
        let blocks = L::new(BlockList::new(size)?);

        Ok(Pool { region, blocks, _configuration: marker::PhantomData })
    }

    /// Returns the region managed by the pool.
    pub fn region(&self) -> Region { self.region }

    /// Allocates a block of at least `size` bytes, returning its start.
    ///
    /// Returns None if `size` is 0, if no free block is large enough, or if the bookkeeping cannot grow. See
    /// `try_allocate` to distinguish those cases.
    pub fn allocate(&self, size: usize) -> Option<NonNull<u8>> { self.try_allocate(size).ok() }

    /// Allocates a block of at least `size` bytes, returning its start.
    ///
    /// The size is rounded up to the alignment unit, and the first free block large enough, in address order, is
    /// picked. If the block is larger than necessary, the remainder is split off as a new free block.
    ///
    /// #   Errors
    ///
    /// -   `InvalidArgument`, if `size` is 0, or cannot be rounded up.
    /// -   `PoolExhausted`, if no free block is large enough.
    /// -   `AllocationFailure`, if the block needs splitting, and no memory could be obtained to do so.
    ///
    /// In all cases, the pool is unchanged.
    pub fn try_allocate(&self, size: usize) -> Result<NonNull<u8>, Error> {
        if size == 0 {
            return Err(Error::InvalidArgument("zero-sized request"));
        }

        let size = C::ALIGNMENT.round_up(size).ok_or(Error::InvalidArgument("oversized request"))?;

        let offset = self.blocks.locked(|blocks| blocks.allocate(size))?;

        Ok(self.region.address_of(offset))
    }

    /// Releases the block starting at `address`, merging it with its free neighbours.
    ///
    /// #   Errors
    ///
    /// -   `BlockNotFound`, if `address` is not the start of a block currently in use: it was not handed out by this
    ///     pool, or was already released. The pool is unchanged.
    pub fn release(&self, address: NonNull<u8>) -> Result<(), Error> {
        let not_found = Error::BlockNotFound { address: address.as_ptr() as usize };

        let offset = self.region.offset_of(address).ok_or(not_found)?;

        //  Blocks only ever start on a multiple of the alignment unit.
        if offset % C::ALIGNMENT != 0 {
            return Err(not_found);
        }

        self.blocks.locked(|blocks| blocks.release(offset))
            .map(|_| ())
            .ok_or(not_found)
    }

    /// Returns the blocks in use, in address order.
    pub fn used_blocks(&self) -> Vec<BlockInfo> { self.block_infos(Block::is_used) }

    /// Returns the free blocks, in address order.
    pub fn free_blocks(&self) -> Vec<BlockInfo> { self.block_infos(Block::is_free) }

    /// Returns a snapshot of all the blocks, in address order.
    pub fn blocks(&self) -> Vec<Block> { self.blocks.locked(|blocks| blocks.iter().copied().collect()) }

    /// Returns the number of blocks, free and used.
    pub fn block_count(&self) -> usize { self.blocks.locked(|blocks| blocks.count()) }

    /// Returns the state of each alignment unit of the region, in address order.
    pub fn usage_map(&self) -> UsageMap {
        let units = self.blocks.locked(|blocks| {
            let mut units = Vec::with_capacity(blocks.size() / C::ALIGNMENT);

            for block in blocks.iter() {
                let usage = Usage::from(block.is_used());
                units.extend((0..block.size() / C::ALIGNMENT).map(|_| usage));
            }

            units
        });

        UsageMap::new(units, C::USAGE_LINE_WIDTH)
    }

    /// Returns the total size of the region, and the number of bytes not in use.
    pub fn info(&self) -> MemoryInfo {
        let used = self.blocks.locked(|blocks| blocks.used_size());
        let total = self.region.size();

        MemoryInfo { total, free: total - used }
    }

    /// Destroys the pool, returning the region it managed.
    ///
    /// Any address handed out by the pool is no longer tracked; reclaiming the region is up to the caller.
    pub fn destroy(self) -> Region {
        let region = self.region;

        drop(self.blocks.into_inner());

        region
    }

    //  Returns the address and size of the blocks matching `predicate`.
    fn block_infos(&self, predicate: fn(&Block) -> bool) -> Vec<BlockInfo> {
        let region = self.region;

        self.blocks.locked(|blocks| {
            blocks.iter()
                .filter(|block| predicate(block))
                .map(|block| BlockInfo { address: region.address_of(block.offset()), size: block.size() })
                .collect()
        })
    }
}
