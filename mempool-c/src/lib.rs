#![deny(missing_docs)]

//! Exposition of the MemPool API via a C ABI.
//!
//! A pool is created by `mp_init`, and must be destroyed by `mp_destroy`; every other function takes the handle
//! returned by `mp_init`. A null handle is rejected by every function.

use std::{
    io::{self, Write},
    ptr::{self, NonNull},
};

use mempool::DefaultConfiguration;

type MemPool = mempool::MemPool<DefaultConfiguration>;

/// Opaque handle to a pool.
#[repr(C)]
pub struct MpPool {
    _private: [u8; 0],
}

/// Success.
pub const MP_OK: i32 = 0;

/// A null handle or pointer, or a zero size, was passed.
pub const MP_INVALID_ARGUMENT: i32 = -1;

/// The pointer passed to `mp_free` does not start a block in use.
pub const MP_BLOCK_NOT_FOUND: i32 = -2;

/// Creates a pool managing the `size` bytes starting at `start`.
///
/// Returns a null pointer if `start` is null, if `size` is less than 4, or if the pool cannot be created.
///
/// The memory is neither read nor written by the pool; it must remain valid until `mp_destroy` is called.
#[cold]
#[no_mangle]
pub extern fn mp_init(start: *mut u8, size: usize) -> *mut MpPool {
    match MemPool::new(start, size) {
        Ok(pool) => Box::into_raw(Box::new(pool)) as *mut MpPool,
        Err(_) => ptr::null_mut(),
    }
}

/// Allocates a block of at least `size` bytes, rounded up to a multiple of 4.
///
/// Returns a null pointer if `pool` is null, if `size` is 0, or if no free block is large enough.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
#[no_mangle]
pub unsafe extern fn mp_malloc(pool: *const MpPool, size: usize) -> *mut u8 {
    match as_pool(pool) {
        Some(pool) => pool.allocate(size).map(NonNull::as_ptr).unwrap_or(ptr::null_mut()),
        None => ptr::null_mut(),
    }
}

/// Releases the block starting at `pointer`.
///
/// Returns `MP_OK` on success, `MP_INVALID_ARGUMENT` if `pool` or `pointer` is null, and `MP_BLOCK_NOT_FOUND` if
/// `pointer` does not start a block in use, in which case the pool is unchanged.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
#[no_mangle]
pub unsafe extern fn mp_free(pool: *const MpPool, pointer: *mut u8) -> i32 {
    let (pool, pointer) = match (as_pool(pool), NonNull::new(pointer)) {
        (Some(pool), Some(pointer)) => (pool, pointer),
        _ => return MP_INVALID_ARGUMENT,
    };

    //  A non-null pointer can only fail to match a block in use.
    if pool.release(pointer).is_ok() { MP_OK } else { MP_BLOCK_NOT_FOUND }
}

/// Retrieves the total size of the pool, and the number of bytes not in use.
///
/// Returns `MP_OK` on success, and `MP_INVALID_ARGUMENT` if any argument is null.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
/// -   Assumes that `total_size` and `free_size` are null, or valid for writes.
#[no_mangle]
pub unsafe extern fn mp_get_memory_info(pool: *const MpPool, total_size: *mut usize, free_size: *mut usize) -> i32 {
    let pool = match as_pool(pool) {
        Some(pool) if !total_size.is_null() && !free_size.is_null() => pool,
        _ => return MP_INVALID_ARGUMENT,
    };

    let info = pool.info();

    //  Safety:
    //  -   Both pointers are non-null, and assumed valid for writes.
    total_size.write(info.total);
    free_size.write(info.free);

    MP_OK
}

/// Prints the blocks in use on the standard output, one per line.
///
/// Returns `MP_OK` on success, and `MP_INVALID_ARGUMENT` if `pool` is null.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
#[no_mangle]
pub unsafe extern fn mp_print_used_blocks(pool: *const MpPool) -> i32 { print_with(pool, write_used_blocks) }

/// Prints the free blocks on the standard output, one per line.
///
/// Returns `MP_OK` on success, and `MP_INVALID_ARGUMENT` if `pool` is null.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
#[no_mangle]
pub unsafe extern fn mp_print_free_blocks(pool: *const MpPool) -> i32 { print_with(pool, write_free_blocks) }

/// Prints the usage map of the pool on the standard output: one symbol per 4 bytes, `.` if free and `#` if used.
///
/// Returns `MP_OK` on success, and `MP_INVALID_ARGUMENT` if `pool` is null.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
#[no_mangle]
pub unsafe extern fn mp_print_memory_usage(pool: *const MpPool) -> i32 { print_with(pool, write_memory_usage) }

/// Destroys the pool.
///
/// Does nothing if `pool` is null.
///
/// #   Safety
///
/// -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
/// -   Assumes that `pool` is not used afterwards.
#[cold]
#[no_mangle]
pub unsafe extern fn mp_destroy(pool: *mut MpPool) {
    if pool.is_null() {
        return;
    }

    //  Safety:
    //  -   `pool` was produced by `Box::into_raw` in `mp_init`, and not yet destroyed.
    let pool = Box::from_raw(pool as *mut MemPool);
    pool.destroy();
}

//
//  Implementation
//

//  Safety:
//  -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
unsafe fn as_pool<'a>(pool: *const MpPool) -> Option<&'a MemPool> { (pool as *const MemPool).as_ref() }

//  Safety:
//  -   Assumes that `pool` is null, or was returned by `mp_init` and not yet destroyed.
unsafe fn print_with(pool: *const MpPool, writer: fn(&MemPool, &mut dyn Write) -> io::Result<()>) -> i32 {
    let pool = match as_pool(pool) {
        Some(pool) => pool,
        None => return MP_INVALID_ARGUMENT,
    };

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    //  Failing to print is not a failure of the pool.
    let _ = writer(pool, &mut stdout).and_then(|_| stdout.flush());

    MP_OK
}

fn write_used_blocks(pool: &MemPool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Used blocks:")?;

    for block in pool.used_blocks() {
        writeln!(out, "{}", block)?;
    }

    Ok(())
}

fn write_free_blocks(pool: &MemPool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Free blocks:")?;

    for block in pool.free_blocks() {
        writeln!(out, "{}", block)?;
    }

    Ok(())
}

fn write_memory_usage(pool: &MemPool, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Memory usage (.: free, #: used):")?;
    writeln!(out, "{}", pool.usage_map())
}
