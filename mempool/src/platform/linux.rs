//! Implementation of Linux specific calls.

use core::{alloc::Layout, ptr};

use mempool_core::{Platform, PowerOf2};

/// Implementation of the Platform trait, for Linux.
///
/// Regions are anonymous private mappings, rounded up to a multiple of the page size.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinuxPlatform;

impl LinuxPlatform {
    /// Creates an instance.
    pub const fn new() -> Self { Self }

    /// Returns the page size of the system.
    pub fn page_size() -> PowerOf2 {
        const FALLBACK: PowerOf2 = unsafe { PowerOf2::new_unchecked(4096) };

        //  Safety:
        //  -   `_SC_PAGESIZE` is a valid name.
        let result = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

        if result <= 0 {
            return FALLBACK;
        }

        PowerOf2::new(result as usize).unwrap_or(FALLBACK)
    }

    fn mapped_size(layout: Layout) -> Option<usize> { Self::page_size().round_up(layout.size()) }
}

impl Platform for LinuxPlatform {
    unsafe fn allocate(&self, layout: Layout) -> Option<ptr::NonNull<u8>> {
        debug_assert!(layout.size() > 0);

        //  Mappings are page-aligned, and no more.
        if layout.align() > Self::page_size().value() {
            return None;
        }

        mmap_allocate(Self::mapped_size(layout)?)
    }

    unsafe fn deallocate(&self, pointer: ptr::NonNull<u8>, layout: Layout) {
        //  The size was rounded up successfully when allocating, it cannot fail now.
        if let Some(size) = Self::mapped_size(layout) {
            munmap_deallocate(pointer.as_ptr(), size);
        }
    }
}

//  Wrapper around `mmap`.
//
//  Returns a pointer to `size` bytes of zeroed memory, aligned on a page boundary.
fn mmap_allocate(size: usize) -> Option<ptr::NonNull<u8>> {
    let length = size;
    let prot = libc::PROT_READ | libc::PROT_WRITE;
    let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

    //  No specific address hint.
    let addr = ptr::null_mut();
    //  When used in conjunction with MAP_ANONYMOUS, fd is mandated to be -1 on some implementations.
    let fd = -1;
    //  When used in conjunction with MAP_ANONYMOUS, offset is mandated to be 0 on some implementations.
    let offset = 0;

    //  Safety:
    //  -   `addr`, `fd`, and `offset` are suitable for MAP_ANONYMOUS.
    let result = unsafe { libc::mmap(addr, length, prot, flags, fd, offset) };

    let result = if result != libc::MAP_FAILED { result as *mut u8 } else { ptr::null_mut() };
    ptr::NonNull::new(result)
}

//  Wrapper around `munmap`.
//
//  #   Panics
//
//  If `munmap` returns a non-0 result.
//
//  #   Safety
//
//  -   Assumes that `addr` points to a `mmap`ed area of at least `size` bytes.
//  -   Assumes that the range `[addr, addr + size)` is no longer in use.
unsafe fn munmap_deallocate(addr: *mut u8, size: usize) {
    let result = libc::munmap(addr as *mut libc::c_void, size);
    assert!(result == 0, "Could not munmap {:x}, {}: {}", addr as usize, size, result);
}
