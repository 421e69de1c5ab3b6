/*!
 * Memory Subsystem Seam
 *
 * The lifecycle core consumes the memory/GC engine through this trait and a
 * process-wide binding. The default binding is a no-op engine so the crate is
 * usable standalone; embedders install the real engine during setup.
 */

use super::MemoryHandle;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::LazyLock;

/// Per-instance memory state management, as consumed by the lifecycle core.
///
/// Methods that take no handle operate against the calling thread; the core
/// guarantees it calls them on the thread that owns (or is acquiring) the
/// instance.
pub trait MemorySubsystem: Send + Sync {
    /// Create the memory state for a new instance.
    fn init(&self) -> MemoryHandle;

    /// Release the memory state of a destroyed instance.
    fn deinit(&self, handle: MemoryHandle);

    /// Detach the calling thread's memory state for later resumption,
    /// returning the handle to store in its place.
    fn suspend(&self) -> MemoryHandle;

    /// Reattach a previously suspended memory state to the calling thread.
    /// The handle stays with the instance.
    fn resume(&self, handle: &MemoryHandle);
}

/// Default subsystem: grants unit tokens and drops them on release.
pub struct NullMemory;

impl MemorySubsystem for NullMemory {
    fn init(&self) -> MemoryHandle {
        MemoryHandle::new(())
    }

    fn deinit(&self, handle: MemoryHandle) {
        drop(handle);
    }

    fn suspend(&self) -> MemoryHandle {
        MemoryHandle::new(())
    }

    fn resume(&self, _handle: &MemoryHandle) {}
}

static SUBSYSTEM: LazyLock<RwLock<Arc<dyn MemorySubsystem>>> =
    LazyLock::new(|| RwLock::new(Arc::new(NullMemory)));

/// Install the process-wide memory subsystem.
///
/// Setup-time API: instances hold handles granted by the subsystem that
/// created them, so the binding must be in place before the first instance
/// and must not change while any instance is alive.
pub fn set_memory_subsystem(subsystem: Arc<dyn MemorySubsystem>) {
    log::info!("Memory subsystem installed");
    *SUBSYSTEM.write() = subsystem;
}

pub(crate) fn subsystem() -> Arc<dyn MemorySubsystem> {
    SUBSYSTEM.read().clone()
}
