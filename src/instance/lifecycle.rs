/*!
 * Lifecycle Operations
 *
 * Creation, destruction, suspension, and resumption of runtime instances,
 * plus the first/last edge work: the first creation of a process epoch runs
 * process-wide bring-up and opens the globals gate, the last destruction runs
 * process-wide teardown and re-arms it.
 *
 * Ordering carried by this module:
 * - `InitGlobals` completes before any other thread's
 *   `InitThreadLocalGlobals` starts (the gate enforces it)
 * - every `DeinitThreadLocalGlobals` completes before `DeinitGlobals` starts
 *   (per-instance teardown runs its thread-local phase before decrementing
 *   the alive count, so the last decrement proves all thread-local work is
 *   done)
 * - an instance is inserted into the registry only after both init phases
 *   and removed before its memory handle is released
 */

use crate::core::errors::{fatal, RuntimeError};
use crate::core::sync::ReadyEvent;
use crate::init::{self, Phase};
use crate::instance::status::ExecutionStatus;
use crate::instance::{RuntimeHandle, RuntimeInstance};
use crate::interrupt;
use crate::memory;
use crate::platform;
use crate::registry;
use crate::telemetry::LifecycleSpan;
use crate::thread;
use log::{debug, error, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

/// Count of instances between creation and destruction. Only the 0 -> 1 and
/// 1 -> 0 edges carry meaning.
static ALIVE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Open while the current process epoch's `InitGlobals` is complete; re-armed
/// by the last destruction.
static GLOBALS_GATE: ReadyEvent = ReadyEvent::new();

/// One-shot panic logger; stays installed for the life of the process.
static PANIC_HOOK: Once = Once::new();

/// Create a detached instance owned by the calling thread.
///
/// The instance is returned suspended; bind it with [`crate::resume`] or use
/// [`crate::ensure_attached`] for the attach-or-create path. The first
/// creation of a process epoch performs process-wide bring-up and runs
/// `InitGlobals`; every other creation waits for that to finish. The new
/// instance becomes visible to registry readers only as the final step, fully
/// constructed.
#[must_use]
pub fn create() -> RuntimeHandle {
    install_panic_hook();
    let span = LifecycleSpan::new("create");
    let thread_id = platform::current_thread_id();
    let instance = RuntimeInstance::new(thread_id, memory::subsystem().init());
    span.record_instance(instance.id());

    let first_runtime = ALIVE_COUNT.fetch_add(1, Ordering::SeqCst) == 0;
    if first_runtime {
        info!("First runtime instance; running process bring-up");
        interrupt::install_trampoline();
        thread::mark_main_thread();
        platform::console_init();
        init::run_phase(Phase::InitGlobals);
        GLOBALS_GATE.set();
    } else {
        GLOBALS_GATE.wait();
    }
    init::run_phase(Phase::InitThreadLocalGlobals);

    registry::registry().insert(instance.clone());
    debug!("Created instance {} on thread {}", instance.id(), thread_id);
    RuntimeHandle::new(instance)
}

/// Destroy a detached instance.
///
/// The instance must be suspended; destroying it while bound to a thread is
/// a protocol violation. The last destruction of a process epoch runs
/// `DeinitGlobals` after the final thread-local teardown and re-arms the
/// globals gate, so a later creation starts a fresh epoch.
pub fn destroy(handle: RuntimeHandle) {
    handle.instance().status.transition(
        "destroy",
        ExecutionStatus::Suspended,
        ExecutionStatus::Destroying,
    );
    teardown(handle);
}

/// Detach the calling thread's instance and leave it suspended.
///
/// Fatal when no instance is bound. The memory handle is exchanged wholesale
/// for the subsystem's suspended representation; the caller receives the
/// ownership token and may resume it on any thread.
#[must_use]
pub fn suspend() -> RuntimeHandle {
    let instance = thread::current();
    instance.status.transition(
        "suspend",
        ExecutionStatus::Running,
        ExecutionStatus::Suspended,
    );
    instance.store_memory(memory::subsystem().suspend());
    let handle = match thread::take_binding() {
        Some(handle) => handle,
        None => fatal(RuntimeError::NoActiveRuntime),
    };
    debug!("Suspended instance {}", instance.id());
    handle
}

/// Bind a suspended instance to the calling thread and resume it.
///
/// Fatal when the thread already has an instance bound. The stored memory
/// handle is lent to the subsystem and stays with the instance.
pub fn resume(handle: RuntimeHandle) {
    if thread::try_current().is_some() {
        fatal(RuntimeError::AlreadyActive);
    }
    let instance = handle.instance().clone();
    instance.status.transition(
        "resume",
        ExecutionStatus::Suspended,
        ExecutionStatus::Running,
    );
    thread::bind(handle);
    memory::subsystem().resume(&instance.memory_handle("resume"));
    debug!("Resumed instance {} on this thread", instance.id());
}

/// Destruction entry for a bound instance, used by explicit detach and the
/// thread-exit hook.
pub(crate) fn destroy_attached(handle: RuntimeHandle) {
    handle.instance().status.transition(
        "detach",
        ExecutionStatus::Running,
        ExecutionStatus::Destroying,
    );
    teardown(handle);
}

/// Shared teardown; the instance is already `Destroying`.
fn teardown(handle: RuntimeHandle) {
    let instance = handle.into_instance();
    let span = LifecycleSpan::new("destroy");
    span.record_instance(instance.id());
    init::run_phase(Phase::DeinitThreadLocalGlobals);

    let last_runtime = ALIVE_COUNT.fetch_sub(1, Ordering::SeqCst) == 1;
    if last_runtime {
        info!("Last runtime instance; running process teardown");
        init::run_phase(Phase::DeinitGlobals);
        GLOBALS_GATE.reset();
    }

    registry::registry().remove(&instance);
    memory::subsystem().deinit(instance.take_memory("deinit"));
    debug!("Destroyed instance {}", instance.id());
}

/// Number of instances currently alive. Diagnostic; racy by nature.
#[must_use]
pub fn alive_count() -> usize {
    ALIVE_COUNT.load(Ordering::SeqCst)
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            error!("Runtime panic: {panic_info}");
            default_hook(panic_info);
        }));
    });
}
