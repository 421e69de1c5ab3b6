/*!
 * Runtime Instance
 *
 * Per-instance state block: owning thread identity, execution status, the
 * memory subsystem handle, and the optional interrupt callback. Shared as
 * `Arc<RuntimeInstance>` (registry, dispatch, inspection); exclusively owned
 * through [`RuntimeHandle`] (binding cell or suspender).
 */

use crate::core::errors::{fatal, RuntimeError};
use crate::core::types::{InstanceId, ThreadId};
use crate::instance::status::{AtomicStatus, ExecutionStatus};
use crate::memory::MemoryHandle;
use arc_swap::ArcSwapOption;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Interrupt callback invoked against the owning instance.
///
/// Boxed behind an `Arc` slot so the dispatch path can load it with a single
/// atomic pointer read.
pub type InterruptHandler = Box<dyn Fn(&RuntimeInstance) + Send + Sync>;

pub struct RuntimeInstance {
    id: InstanceId,
    owning_thread_id: ThreadId,
    pub(crate) status: AtomicStatus,
    memory: Mutex<Option<MemoryHandle>>,
    interrupt_handler: ArcSwapOption<InterruptHandler>,
}

impl RuntimeInstance {
    pub(crate) fn new(owning_thread_id: ThreadId, memory: MemoryHandle) -> Arc<Self> {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Arc::new(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            owning_thread_id,
            status: AtomicStatus::new(ExecutionStatus::Suspended),
            memory: Mutex::new(Some(memory)),
            interrupt_handler: ArcSwapOption::empty(),
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Identity of the thread that created this instance.
    ///
    /// Stays fixed for the whole lifetime, including across suspend and a
    /// resume on a different thread; interrupt lookup targets the creating
    /// thread.
    #[inline]
    #[must_use]
    pub fn owning_thread_id(&self) -> ThreadId {
        self.owning_thread_id
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> ExecutionStatus {
        self.status.load()
    }

    /// Install the interrupt callback. Owner-side API; visibility to a
    /// concurrent dispatch is best-effort.
    pub fn set_interrupt_handler<F>(&self, handler: F)
    where
        F: Fn(&RuntimeInstance) + Send + Sync + 'static,
    {
        self.interrupt_handler
            .store(Some(Arc::new(Box::new(handler))));
    }

    pub fn clear_interrupt_handler(&self) {
        self.interrupt_handler.store(None);
    }

    #[must_use]
    pub fn has_interrupt_handler(&self) -> bool {
        self.interrupt_handler.load().is_some()
    }

    /// Invoke the interrupt callback if one is installed; silently does
    /// nothing otherwise. At most one invocation per call.
    pub(crate) fn fire_interrupt(&self) {
        if let Some(handler) = self.interrupt_handler.load_full() {
            (*handler)(self);
        }
    }

    /// Racy point-in-time view for cross-thread inspection.
    #[must_use]
    pub fn info(&self) -> InstanceInfo {
        InstanceInfo {
            instance_id: self.id,
            owning_thread_id: self.owning_thread_id,
            status: self.status(),
            has_interrupt_handler: self.has_interrupt_handler(),
        }
    }

    /// Surrender the memory handle. Missing handle means the ownership
    /// protocol was bypassed, which is fatal.
    pub(crate) fn take_memory(&self, operation: &'static str) -> MemoryHandle {
        match self.memory.lock().take() {
            Some(handle) => handle,
            None => fatal(RuntimeError::MemoryHandleMissing {
                operation: operation.into(),
            }),
        }
    }

    /// Replace the stored handle wholesale, dropping the previous one.
    pub(crate) fn store_memory(&self, handle: MemoryHandle) {
        *self.memory.lock() = Some(handle);
    }

    /// Borrow the stored handle without giving it up.
    pub(crate) fn memory_handle(
        &self,
        operation: &'static str,
    ) -> MappedMutexGuard<'_, MemoryHandle> {
        MutexGuard::map(self.memory.lock(), |slot| match slot {
            Some(handle) => handle,
            None => fatal(RuntimeError::MemoryHandleMissing {
                operation: operation.into(),
            }),
        })
    }
}

impl fmt::Debug for RuntimeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeInstance")
            .field("id", &self.id)
            .field("owning_thread_id", &self.owning_thread_id)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Unique ownership token for a detached-or-bound instance.
///
/// Exactly one handle exists per live instance; it sits in the owning
/// thread's binding cell while the instance runs and travels with the caller
/// while the instance is suspended. Deliberately not `Clone` and handed over
/// by value on every ownership transfer.
#[derive(Debug)]
pub struct RuntimeHandle {
    instance: Arc<RuntimeInstance>,
}

impl RuntimeHandle {
    pub(crate) fn new(instance: Arc<RuntimeInstance>) -> Self {
        Self { instance }
    }

    #[must_use]
    pub fn instance(&self) -> &Arc<RuntimeInstance> {
        &self.instance
    }

    pub(crate) fn into_instance(self) -> Arc<RuntimeInstance> {
        self.instance
    }
}

/// Serializable snapshot of one instance for cross-thread inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InstanceInfo {
    pub instance_id: InstanceId,
    pub owning_thread_id: ThreadId,
    pub status: ExecutionStatus,
    pub has_interrupt_handler: bool,
}
