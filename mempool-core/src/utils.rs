//! A collection of utilities.

use core::ptr::NonNull;

mod power_of_2;

pub use power_of_2::PowerOf2;

/// Returns the offset of `address` from `start`, if `address` is not below `start`.
pub(crate) fn offset_from(start: NonNull<u8>, address: NonNull<u8>) -> Option<usize> {
    (address.as_ptr() as usize).checked_sub(start.as_ptr() as usize)
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn offset_from() {
    fn offset(start: usize, address: usize) -> Option<usize> {
        let start = NonNull::new(start as *mut u8).unwrap();
        let address = NonNull::new(address as *mut u8).unwrap();
        super::offset_from(start, address)
    }

    assert_eq!(Some(0), offset(0x1000, 0x1000));
    assert_eq!(Some(4), offset(0x1000, 0x1004));
    assert_eq!(Some(0x1000), offset(0x1000, 0x2000));

    assert_eq!(None, offset(0x1000, 0x0fff));
    assert_eq!(None, offset(0x1000, 0x0001));
}

}
