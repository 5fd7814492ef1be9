//! MemPool

use core::ptr::NonNull;

use mempool_core::{
    Block, BlockInfo, BlockList, Configuration, DefaultConfiguration, Error, MemoryInfo, Pool, Region, UsageMap,
};
use tracing::{debug, trace, warn};

use crate::MutexLock;

#[cfg(target_os = "linux")]
use crate::platform::{LinuxPlatform, Mapping};

/// A thread-safe memory pool over a fixed region.
///
/// Every operation is serialized by a single mutex, held for the whole operation.
pub struct MemPool<C = DefaultConfiguration> {
    pool: Pool<C, MutexLock<BlockList>>,
    //  Declared after `pool`, so the region is unmapped only once the pool is gone.
    #[cfg(target_os = "linux")]
    mapping: Option<Mapping<LinuxPlatform>>,
}

impl<C> MemPool<C>
    where
        C: Configuration,
{
    /// Creates a pool managing the `size` bytes starting at `start`.
    ///
    /// The pool never reads nor writes this memory. It is up to the caller to keep it valid for as long as the pool,
    /// and the addresses it handed out, are in use.
    ///
    /// #   Errors
    ///
    /// -   `InvalidArgument`, if `start` is null or `size` is less than the alignment unit.
    /// -   `AllocationFailure`, if the bookkeeping memory cannot be obtained.
    pub fn new(start: *mut u8, size: usize) -> Result<Self, Error> {
        let pool = Self::create(start, size)?;

        Ok(MemPool {
            pool,
            #[cfg(target_os = "linux")]
            mapping: None,
        })
    }

    /// Creates a pool managing a freshly mapped region of at least `size` bytes.
    ///
    /// The region is unmapped when the pool is dropped.
    ///
    /// #   Errors
    ///
    /// -   `InvalidArgument`, if `size` is less than the alignment unit.
    /// -   `AllocationFailure`, if the region or the bookkeeping memory cannot be obtained.
    #[cfg(target_os = "linux")]
    pub fn with_capacity(size: usize) -> Result<Self, Error> {
        if size < C::ALIGNMENT.value() {
            return Err(Error::InvalidArgument("region smaller than the alignment unit"));
        }

        let mapping = Mapping::new(LinuxPlatform::new(), size).ok_or_else(|| {
            warn!("Failed to map a region of {} bytes", size);
            Error::AllocationFailure
        })?;

        let pool = Self::create(mapping.start().as_ptr(), mapping.size())?;

        Ok(MemPool { pool, mapping: Some(mapping) })
    }

    /// Returns the region managed by the pool.
    pub fn region(&self) -> Region { self.pool.region() }

    /// Allocates a block of at least `size` bytes, returning its start.
    ///
    /// Returns None if `size` is 0, or if no block large enough is available.
    pub fn allocate(&self, size: usize) -> Option<NonNull<u8>> { self.try_allocate(size).ok() }

    /// Allocates a block of at least `size` bytes, returning its start.
    ///
    /// See `mempool_core::Pool::try_allocate`.
    pub fn try_allocate(&self, size: usize) -> Result<NonNull<u8>, Error> {
        match self.pool.try_allocate(size) {
            Ok(address) => {
                trace!("Allocated {:p} for {} bytes", address, size);
                Ok(address)
            }
            Err(error @ Error::PoolExhausted { .. }) => {
                debug!("Pool at {:p} exhausted: {}", self.region().start(), error);
                Err(error)
            }
            Err(error) => {
                warn!("Failed to allocate {} bytes from pool at {:p}: {}", size, self.region().start(), error);
                Err(error)
            }
        }
    }

    /// Releases the block starting at `address`.
    ///
    /// #   Errors
    ///
    /// -   `BlockNotFound`, if `address` does not start a block in use; the pool is left unchanged.
    pub fn release(&self, address: NonNull<u8>) -> Result<(), Error> {
        match self.pool.release(address) {
            Ok(()) => {
                trace!("Released {:p}", address);
                Ok(())
            }
            Err(error) => {
                warn!("Failed to release {:p} into pool at {:p}: {}", address, self.region().start(), error);
                Err(error)
            }
        }
    }

    /// Returns the blocks in use, in address order.
    pub fn used_blocks(&self) -> Vec<BlockInfo> { self.pool.used_blocks() }

    /// Returns the free blocks, in address order.
    pub fn free_blocks(&self) -> Vec<BlockInfo> { self.pool.free_blocks() }

    /// Returns a snapshot of all the blocks, in address order.
    pub fn blocks(&self) -> Vec<Block> { self.pool.blocks() }

    /// Returns the number of blocks, free and used.
    pub fn block_count(&self) -> usize { self.pool.block_count() }

    /// Returns the state of each alignment unit of the region.
    pub fn usage_map(&self) -> UsageMap { self.pool.usage_map() }

    /// Returns the total size of the region, and the number of bytes not in use.
    pub fn info(&self) -> MemoryInfo { self.pool.info() }

    /// Destroys the pool.
    ///
    /// Addresses handed out by the pool are no longer tracked; a mapped region is unmapped.
    pub fn destroy(self) {
        let info = self.pool.info();
        let region = self.pool.destroy();

        debug!("Destroyed pool at {:p}, {} of {} bytes still in use", region.start(), info.used(), info.total);
    }

    fn create(start: *mut u8, size: usize) -> Result<Pool<C, MutexLock<BlockList>>, Error> {
        let pool = Pool::new(start, size).map_err(|error| {
            warn!("Failed to create pool at {:p}, {} bytes: {}", start, size, error);
            error
        })?;

        debug!("Created pool at {:p}, {} bytes managed", start, pool.region().size());

        Ok(pool)
    }
}
