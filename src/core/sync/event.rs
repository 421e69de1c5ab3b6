/*!
 * Ready Event
 *
 * Re-armable gate built on a condition variable. The lifecycle uses one to
 * order one-time global initialization before every per-thread
 * initialization: the first creator sets the gate after the global phase,
 * later creators wait on it, and the last destroyer re-arms it so a future
 * first creator runs the global phase again.
 */

use parking_lot::{Condvar, Mutex};

pub struct ReadyEvent {
    ready: Mutex<bool>,
    cond: Condvar,
}

impl ReadyEvent {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Mark the event ready and wake every waiter.
    pub fn set(&self) {
        let mut ready = self.ready.lock();
        *ready = true;
        self.cond.notify_all();
    }

    /// Re-arm the event so later waiters block again.
    pub fn reset(&self) {
        *self.ready.lock() = false;
    }

    /// Block until the event is set. Returns immediately when already set.
    pub fn wait(&self) {
        let mut ready = self.ready.lock();
        while !*ready {
            self.cond.wait(&mut ready);
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        *self.ready.lock()
    }
}

impl Default for ReadyEvent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_returns_immediately_when_set() {
        let event = ReadyEvent::new();
        event.set();
        event.wait();
        assert!(event.is_set());
    }

    #[test]
    fn test_waiter_blocks_until_set() {
        static EVENT: ReadyEvent = ReadyEvent::new();
        static SIGNALED: AtomicBool = AtomicBool::new(false);

        let waiter = thread::spawn(|| {
            EVENT.wait();
            assert!(SIGNALED.load(Ordering::SeqCst));
        });
        thread::sleep(Duration::from_millis(20));
        SIGNALED.store(true, Ordering::SeqCst);
        EVENT.set();
        waiter.join().unwrap();
        EVENT.reset();
        assert!(!EVENT.is_set());
    }

    #[test]
    fn test_reset_rearms_the_gate() {
        let event = ReadyEvent::new();
        event.set();
        event.reset();
        assert!(!event.is_set());
        event.set();
        event.wait();
    }
}
