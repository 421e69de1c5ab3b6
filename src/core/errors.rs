/*!
 * Error Types
 * Fatality-oriented diagnostics with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle protocol violations.
///
/// None of these are recoverable at the point of detection: the state machine
/// and registry carry hard invariants, so every violation goes through
/// [`fatal`] rather than being returned to the caller. The enum exists so the
/// final diagnostic names the violated rule with a stable code instead of a
/// bare string.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RuntimeError {
    #[error("Illegal status transition in {operation}: expected {expected}, found {found}")]
    #[diagnostic(
        code(runtime::invalid_transition),
        help("Status moves through single-shot compare-and-swap only. A failed swap means the caller did not own the instance in the expected state.")
    )]
    InvalidTransition {
        operation: String,
        expected: String,
        found: String,
    },

    #[error("Runtime instance not present in the registry")]
    #[diagnostic(
        code(runtime::not_registered),
        help("Every live instance is registered from the end of creation to the start of destruction. Removal of an absent instance means the registry was corrupted.")
    )]
    NotRegistered,

    #[error("No active runtime on this thread")]
    #[diagnostic(
        code(runtime::no_active_runtime),
        help("Attach a runtime with ensure_attached() or resume() before calling thread-bound operations.")
    )]
    NoActiveRuntime,

    #[error("A runtime is already active on this thread")]
    #[diagnostic(
        code(runtime::already_active),
        help("Suspend or destroy the bound runtime before resuming another one on this thread.")
    )]
    AlreadyActive,

    #[error("Operation is restricted to the main thread")]
    #[diagnostic(
        code(runtime::not_main_thread),
        help("Privileged operations run only on the thread that performed first-runtime setup.")
    )]
    NotMainThread,

    #[error("Registry lock released while not held")]
    #[diagnostic(
        code(runtime::lock_not_held),
        help("Lock-held enumeration must happen inside the registry guard scope.")
    )]
    LockNotHeld,

    #[error("Memory handle missing during {operation}")]
    #[diagnostic(
        code(runtime::memory_handle_missing),
        help("An instance owns exactly one memory handle from creation to destruction. A missing handle means the ownership protocol was bypassed.")
    )]
    MemoryHandleMissing { operation: String },
}

/// Report a protocol violation and abort the failing control flow.
///
/// Violations are logged through the logging facade first so embedders with a
/// subscriber installed capture the diagnostic code, then the process panics.
/// Hosts that prefer a hard stop build with `panic = "abort"`.
#[cold]
pub fn fatal(err: RuntimeError) -> ! {
    log::error!("fatal runtime violation: {err}");
    panic!("{err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_error_serialization() {
        let error = RuntimeError::InvalidTransition {
            operation: "resume".into(),
            expected: "Suspended".into(),
            found: "Running".into(),
        };
        let json = serde_json::to_string(&error).unwrap();
        let deserialized: RuntimeError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_unit_variant_serialization() {
        let error = RuntimeError::NoActiveRuntime;
        let json = serde_json::to_string(&error).unwrap();
        let deserialized: RuntimeError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_error_messages_name_the_rule() {
        let error = RuntimeError::MemoryHandleMissing {
            operation: "deinit".into(),
        };
        assert!(error.to_string().contains("deinit"));
        assert_eq!(
            RuntimeError::NoActiveRuntime.to_string(),
            "No active runtime on this thread"
        );
    }
}
