/*!
 * Runtime Host Library
 *
 * Lifecycle manager for instances of a managed-language runtime embedded in
 * a host process. Threads attach lazily or manage detached instances by
 * handle; global initializers run exactly once per process epoch with
 * per-thread phases ordered around them; a process-wide registry supports
 * cross-thread inspection and the signal-context interrupt fallback.
 *
 * Typical embedding:
 *
 * ```no_run
 * runtime_host::telemetry::init_tracing();
 * runtime_host::register_initializer(|phase| {
 *     // set up or tear down globals for `phase`
 *     let _ = phase;
 * });
 *
 * runtime_host::ensure_attached();
 * let info = runtime_host::current().info();
 * assert!(info.status.is_running());
 * runtime_host::ensure_detached_and_destroyed();
 * ```
 */

pub mod core;
pub mod init;
pub mod instance;
pub mod interrupt;
pub mod memory;
pub mod platform;
pub mod registry;
pub mod telemetry;
pub mod thread;

// Re-exports
pub use crate::core::{fatal, InstanceId, RuntimeError, ThreadId};
pub use init::{register_initializer, InitializerRegistry, Phase};
pub use instance::{
    alive_count, create, destroy, resume, suspend, ExecutionStatus, InstanceInfo,
    InterruptHandler, RuntimeHandle, RuntimeInstance,
};
pub use interrupt::dispatch_current_thread;
pub use memory::{set_memory_subsystem, MemoryHandle, MemorySubsystem};
pub use registry::{instances, with_registry_lock};
pub use thread::{
    check_main_thread, current, ensure_attached, ensure_detached_and_destroyed, is_main_thread,
    try_current,
};
