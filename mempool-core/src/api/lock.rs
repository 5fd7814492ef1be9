//! Lock
//!
//! The Lock trait abstracts the protection of the block list of a `Pool`.
//!
//! Access to the protected value is only ever granted for the duration of a closure, hence the lock is released on
//! every exit path of the closure, early returns and panics included.

use core::cell::RefCell;

/// Abstraction of a mutual-exclusion primitive.
pub trait Lock<T> {
    /// Creates a lock protecting `value`.
    fn new(value: T) -> Self;

    /// Acquires the lock, blocking if necessary, and invokes `f` with exclusive access to the protected value.
    ///
    /// The lock is held for the entire duration of `f`, and released afterwards.
    fn locked<R, F>(&self, f: F) -> R
        where
            F: FnOnce(&mut T) -> R;

    /// Consumes the lock, returning the protected value.
    fn into_inner(self) -> T;
}

/// NoLock
///
/// A Lock which does not lock, for single-threaded use.
///
/// Being `!Sync`, a `Pool` using `NoLock` cannot be shared across threads; re-entrant access panics.
#[derive(Debug, Default)]
pub struct NoLock<T>(RefCell<T>);

impl<T> Lock<T> for NoLock<T> {
    fn new(value: T) -> Self { NoLock(RefCell::new(value)) }

    fn locked<R, F>(&self, f: F) -> R
        where
            F: FnOnce(&mut T) -> R
    {
        f(&mut *self.0.borrow_mut())
    }

    fn into_inner(self) -> T { self.0.into_inner() }
}
