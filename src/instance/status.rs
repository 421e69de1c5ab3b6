/*!
 * Execution Status
 *
 * Three-state machine for a runtime instance. Every move between states is a
 * single compare-and-swap that is never retried: a failed swap means the
 * caller did not own the instance in the state it assumed, which is a
 * protocol violation rather than contention to wait out.
 */

use crate::core::errors::{fatal, RuntimeError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

/// Where an instance sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ExecutionStatus {
    /// Detached from any thread; created instances start here and suspend
    /// returns here.
    Suspended = 0,
    /// Bound to a thread and executing.
    Running = 1,
    /// Teardown has begun; terminal.
    Destroying = 2,
}

impl ExecutionStatus {
    /// Hot path - checked on every dispatch and lifecycle operation
    #[inline(always)]
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, ExecutionStatus::Running)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_suspended(self) -> bool {
        matches!(self, ExecutionStatus::Suspended)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_destroying(self) -> bool {
        matches!(self, ExecutionStatus::Destroying)
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ExecutionStatus::Suspended,
            1 => ExecutionStatus::Running,
            _ => ExecutionStatus::Destroying,
        }
    }
}

/// Atomic [`ExecutionStatus`] cell.
pub struct AtomicStatus {
    raw: AtomicU8,
}

impl AtomicStatus {
    #[must_use]
    pub const fn new(status: ExecutionStatus) -> Self {
        Self {
            raw: AtomicU8::new(status as u8),
        }
    }

    #[inline]
    #[must_use]
    pub fn load(&self) -> ExecutionStatus {
        ExecutionStatus::from_raw(self.raw.load(Ordering::SeqCst))
    }

    /// Single-shot transition attempt.
    ///
    /// On failure the stored status is left untouched and the observed value
    /// is returned. Callers never retry; they either tolerate the failure or
    /// escalate it.
    pub fn try_transition(
        &self,
        from: ExecutionStatus,
        to: ExecutionStatus,
    ) -> Result<(), ExecutionStatus> {
        self.raw
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(ExecutionStatus::from_raw)
    }

    /// Transition that treats failure as a fatal protocol violation,
    /// reported against `operation`.
    pub fn transition(&self, operation: &'static str, from: ExecutionStatus, to: ExecutionStatus) {
        if let Err(found) = self.try_transition(from, to) {
            fatal(RuntimeError::InvalidTransition {
                operation: operation.into(),
                expected: format!("{from:?}"),
                found: format!("{found:?}"),
            });
        }
    }
}

impl std::fmt::Debug for AtomicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AtomicStatus").field(&self.load()).finish()
    }
}
