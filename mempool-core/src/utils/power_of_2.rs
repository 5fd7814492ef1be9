//! An integer guaranteed to be a PowerOf2.

use core::{num, ops};

/// PowerOf2
///
/// An integral guaranteed to be non-zero and a power of 2.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PowerOf2(num::NonZeroUsize);

impl PowerOf2 {
    /// Creates a new instance of PowerOf2.
    ///
    /// Or nothing if the value is not a power of 2.
    pub fn new(value: usize) -> Option<PowerOf2> {
        if value.count_ones() == 1 {
            //  Safety:
            //  -   Value is a power of 2, as per the if check.
            Some(unsafe { PowerOf2::new_unchecked(value) })
        } else {
            None
        }
    }

    /// Creates a new instance of PowerOf2.
    ///
    /// #   Safety
    ///
    /// Assumes that the value is a power of 2.
    pub const unsafe fn new_unchecked(value: usize) -> PowerOf2 {
        //  Safety:
        //  -   A power of 2 cannot be 0.
        PowerOf2(num::NonZeroUsize::new_unchecked(value))
    }

    /// Returns the inner value.
    pub const fn value(&self) -> usize { self.0.get() }

    /// Rounds the value up to the nearest higher multiple of `self`.
    ///
    /// Returns None if the result does not fit in a `usize`.
    pub const fn round_up(&self, n: usize) -> Option<usize> {
        let mask = self.mask();

        match n.checked_add(mask) {
            Some(n) => Some(n & !mask),
            None => None,
        }
    }

    /// Rounds the value down to the nearest lower multiple of `self`.
    pub const fn round_down(&self, n: usize) -> usize { n & !self.mask() }

    const fn bit_index(&self) -> usize { self.value().trailing_zeros() as usize }

    const fn mask(&self) -> usize { self.value() - 1 }
}

impl ops::Div<PowerOf2> for usize {
    type Output = usize;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: PowerOf2) -> usize { self >> rhs.bit_index() }
}

impl ops::Rem<PowerOf2> for usize {
    type Output = usize;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn rem(self, rhs: PowerOf2) -> usize { self & rhs.mask() }
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn power_of_2_new() {
    fn new(value: usize) -> Option<usize> {
        PowerOf2::new(value).map(|p| p.value())
    }

    assert_eq!(None, new(0));
    assert_eq!(Some(1), new(1));
    assert_eq!(Some(2), new(2));
    assert_eq!(None, new(3));
    assert_eq!(Some(4), new(4));
    assert_eq!(None, new(5));
    assert_eq!(None, new(6));
    assert_eq!(None, new(7));
    assert_eq!(Some(8), new(8));
    assert_eq!(None, new(12));
}

#[test]
fn power_of_2_div() {
    fn div(pow2: usize, n: usize) -> usize {
        n / PowerOf2::new(pow2).expect("Power of 2")
    }

    assert_eq!(0, div(4, 0));
    assert_eq!(0, div(4, 3));
    assert_eq!(1, div(4, 4));
    assert_eq!(1, div(4, 7));
    assert_eq!(2, div(4, 8));
    assert_eq!(25_600, div(4, 102_400));
}

#[test]
fn power_of_2_rem() {
    fn rem(pow2: usize, n: usize) -> usize {
        n % PowerOf2::new(pow2).expect("Power of 2")
    }

    assert_eq!(0, rem(4, 0));
    assert_eq!(1, rem(4, 1));
    assert_eq!(2, rem(4, 2));
    assert_eq!(3, rem(4, 3));
    assert_eq!(0, rem(4, 4));
    assert_eq!(1, rem(4, 5));
    assert_eq!(0, rem(4, 16));
}

#[test]
fn power_of_2_round_up() {
    fn round_up(pow2: usize, n: usize) -> Option<usize> {
        PowerOf2::new(pow2).expect("Power of 2").round_up(n)
    }

    assert_eq!(Some(0), round_up(4, 0));
    assert_eq!(Some(4), round_up(4, 1));
    assert_eq!(Some(4), round_up(4, 4));
    assert_eq!(Some(8), round_up(4, 5));
    assert_eq!(Some(8), round_up(4, 8));
    assert_eq!(Some(12), round_up(4, 9));

    assert_eq!(Some(usize::MAX), round_up(1, usize::MAX));
    assert_eq!(None, round_up(4, usize::MAX));
    assert_eq!(None, round_up(4, usize::MAX - 2));
}

#[test]
fn power_of_2_round_down() {
    fn round_down(pow2: usize, n: usize) -> usize {
        PowerOf2::new(pow2).expect("Power of 2").round_down(n)
    }

    assert_eq!(0, round_down(4, 3));
    assert_eq!(4, round_down(4, 4));
    assert_eq!(4, round_down(4, 7));
    assert_eq!(8, round_down(4, 8));
    assert_eq!(16, round_down(4, 17));
    assert_eq!(16, round_down(4, 19));
}

}
