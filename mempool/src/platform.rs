//! Abstraction over OS differences.

use core::{alloc::Layout, ptr::NonNull};

use mempool_core::Platform;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxPlatform;

/// A region of memory obtained from a Platform, returned to it on drop.
pub(crate) struct Mapping<P: Platform> {
    platform: P,
    pointer: NonNull<u8>,
    layout: Layout,
}

impl<P: Platform> Mapping<P> {
    /// Requests a region of at least `size` bytes from `platform`.
    ///
    /// Returns None if `size` is 0, or if the platform cannot satisfy the request.
    pub(crate) fn new(platform: P, size: usize) -> Option<Self> {
        if size == 0 {
            return None;
        }

        let layout = Layout::from_size_align(size, 1).ok()?;

        //  Safety:
        //  -   `layout.size()` is non-zero.
        let pointer = unsafe { platform.allocate(layout)? };

        Some(Mapping { platform, pointer, layout })
    }

    /// Returns the start of the region.
    pub(crate) fn start(&self) -> NonNull<u8> { self.pointer }

    /// Returns the size of the region, as requested.
    pub(crate) fn size(&self) -> usize { self.layout.size() }
}

impl<P: Platform> Drop for Mapping<P> {
    fn drop(&mut self) {
        //  Safety:
        //  -   `self.pointer` was allocated by `self.platform`, with `self.layout`.
        //  -   The pool using the region is gone, as the mapping outlives it.
        unsafe { self.platform.deallocate(self.pointer, self.layout) };
    }
}

//  Safety:
//  -   The mapping only holds the address of the region, which the platform can release from any thread.
unsafe impl<P: Platform + Send> Send for Mapping<P> {}

//  Safety:
//  -   No method of the mapping accesses the memory of the region.
unsafe impl<P: Platform + Sync> Sync for Mapping<P> {}
