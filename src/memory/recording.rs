/*!
 * Recording Memory Subsystem
 *
 * Instrumented implementation of [`MemorySubsystem`]: every grant carries a
 * distinct numeric token and every operation is counted, so callers can
 * verify that handles flow through the lifecycle exactly as granted. Used by
 * the crate's own tests and useful as a diagnostic shim in embedders.
 */

use super::{MemoryHandle, MemorySubsystem};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Default)]
pub struct RecordingMemory {
    next_token: AtomicU64,
    inits: AtomicUsize,
    deinits: AtomicUsize,
    suspends: AtomicUsize,
    resumes: AtomicUsize,
    last_resumed: AtomicU64,
    last_released: AtomicU64,
}

impl RecordingMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn grant(&self) -> MemoryHandle {
        // Token 0 is reserved for "none" in the last_* cells.
        MemoryHandle::new(self.next_token.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn deinits(&self) -> usize {
        self.deinits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn suspends(&self) -> usize {
        self.suspends.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn resumes(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }

    /// Token of the most recently resumed handle, 0 when none.
    #[must_use]
    pub fn last_resumed(&self) -> u64 {
        self.last_resumed.load(Ordering::SeqCst)
    }

    /// Token of the most recently released handle, 0 when none.
    #[must_use]
    pub fn last_released(&self) -> u64 {
        self.last_released.load(Ordering::SeqCst)
    }
}

impl MemorySubsystem for RecordingMemory {
    fn init(&self) -> MemoryHandle {
        self.inits.fetch_add(1, Ordering::SeqCst);
        self.grant()
    }

    fn deinit(&self, handle: MemoryHandle) {
        self.deinits.fetch_add(1, Ordering::SeqCst);
        match handle.into_inner::<u64>() {
            Some(token) => self.last_released.store(token, Ordering::SeqCst),
            None => log::warn!("Released handle was not granted by this subsystem"),
        }
    }

    fn suspend(&self) -> MemoryHandle {
        self.suspends.fetch_add(1, Ordering::SeqCst);
        self.grant()
    }

    fn resume(&self, handle: &MemoryHandle) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        match handle.downcast_ref::<u64>() {
            Some(&token) => self.last_resumed.store(token, Ordering::SeqCst),
            None => log::warn!("Resumed handle was not granted by this subsystem"),
        }
    }
}
