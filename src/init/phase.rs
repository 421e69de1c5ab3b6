/*!
 * Lifecycle Phases
 */

use serde::{Deserialize, Serialize};

/// Global-initializer phases, in the order a single instance meets them.
///
/// The two `*Globals` phases run once per process epoch (first creation, last
/// destruction); the two `*ThreadLocalGlobals` phases run for every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// One-time process-wide setup, run by the first instance creation.
    InitGlobals,
    /// Per-instance setup, run by every creation.
    InitThreadLocalGlobals,
    /// Per-instance teardown, run by every destruction.
    DeinitThreadLocalGlobals,
    /// One-time process-wide teardown, run by the last instance destruction.
    DeinitGlobals,
}

impl Phase {
    /// Whether this phase runs once per process epoch rather than per
    /// instance.
    #[inline]
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Phase::InitGlobals | Phase::DeinitGlobals)
    }

    /// Whether this phase belongs to teardown.
    #[inline]
    #[must_use]
    pub const fn is_teardown(self) -> bool {
        matches!(self, Phase::DeinitThreadLocalGlobals | Phase::DeinitGlobals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_classification() {
        assert!(Phase::InitGlobals.is_global());
        assert!(Phase::DeinitGlobals.is_global());
        assert!(!Phase::InitThreadLocalGlobals.is_global());
        assert!(!Phase::DeinitThreadLocalGlobals.is_global());

        assert!(Phase::DeinitGlobals.is_teardown());
        assert!(Phase::DeinitThreadLocalGlobals.is_teardown());
        assert!(!Phase::InitGlobals.is_teardown());
        assert!(!Phase::InitThreadLocalGlobals.is_teardown());
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&Phase::DeinitThreadLocalGlobals).unwrap();
        let back: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Phase::DeinitThreadLocalGlobals);
    }
}
