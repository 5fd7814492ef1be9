//! Implementation of the Lock trait, on top of parking_lot.

use mempool_core::Lock;

/// A Lock suitable for sharing a pool across threads.
#[derive(Debug, Default)]
pub struct MutexLock<T>(parking_lot::Mutex<T>);

impl<T> Lock<T> for MutexLock<T> {
    fn new(value: T) -> Self { MutexLock(parking_lot::Mutex::new(value)) }

    fn locked<R, F>(&self, f: F) -> R
        where
            F: FnOnce(&mut T) -> R
    {
        let mut guard = self.0.lock();
        f(&mut *guard)
    }

    fn into_inner(self) -> T { self.0.into_inner() }
}

#[cfg(test)]
mod tests {

use std::{sync::Arc, thread};

use super::*;

#[test]
fn mutex_lock_exclusive() {
    let lock = Arc::new(MutexLock::new(0usize));

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let lock = lock.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    lock.locked(|value| *value += 1);
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    let lock = Arc::try_unwrap(lock).unwrap();
    assert_eq!(4_000, lock.into_inner());
}

}
