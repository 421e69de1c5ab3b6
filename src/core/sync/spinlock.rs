/*!
 * Registry Spinlock
 *
 * Minimal test-and-set lock guarding instance registry mutation. Critical
 * sections are a handful of pointer writes, so waiters spin with periodic
 * yields instead of parking.
 */

use crate::core::errors::{fatal, RuntimeError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Test-and-set spinlock with acquire/release semantics.
///
/// Unlock goes through the RAII guard only; releasing a lock that is not held
/// is a fatal protocol violation.
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Acquire the lock, spinning until it is free.
    pub fn lock(&self) -> SpinLockGuard<'_> {
        let mut spin_count: u32 = 0;
        loop {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return SpinLockGuard { lock: self };
            }
            while self.locked.load(Ordering::Relaxed) {
                spin_count = spin_count.wrapping_add(1);
                // Yield to scheduler occasionally
                if spin_count % 32 == 0 {
                    thread::yield_now();
                } else {
                    std::hint::spin_loop();
                }
            }
        }
    }

    /// Whether some thread currently holds the lock.
    ///
    /// Advisory: the answer can be stale by the time the caller acts on it.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    fn unlock(&self) {
        if !self.locked.swap(false, Ordering::Release) {
            fatal(RuntimeError::LockNotHeld);
        }
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII scope for [`SpinLock`]; the lock is held exactly as long as the guard
/// lives.
pub struct SpinLockGuard<'a> {
    lock: &'a SpinLock,
}

impl Drop for SpinLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
