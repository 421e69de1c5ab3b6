/*!
 * Interrupt Dispatch
 *
 * Advisory delivery of a per-instance callback to the thread that received a
 * process interrupt signal. The calling thread's binding is consulted first;
 * thread-local storage can be unavailable or caught mid-update in signal
 * context, so when the binding shows nothing and at least one instance is
 * registered, a lock-free registry scan by the caller's thread id finds the
 * owner. Any miss along the way is silently ignored.
 *
 * Real deliveries arrive on SIGUSR1 through the installed trampoline and run
 * the callback in signal context, where it must hold to async-signal-safety.
 * Direct calls to [`dispatch_current_thread`] (the simulated path) carry no
 * such restriction.
 */

use crate::platform;
use crate::registry;
use crate::thread;
use std::os::raw::c_int;
use std::sync::Once;

/// Route an interrupt to the calling thread's instance, if any.
///
/// Lookup order: thread-local binding, then a lock-free registry scan by the
/// caller's thread id, taken only when some instance is known to be
/// registered. Never takes the registry lock: the signal may have landed
/// while the interrupted thread itself holds it. A binding cell the signal
/// caught mid-update reads as unbound and falls through to the scan. The
/// callback fires at most once per call; no instance or no callback means
/// silence.
pub fn dispatch_current_thread() {
    let target = match thread::try_current() {
        Some(instance) => Some(instance),
        None if !registry::registry().is_empty() => {
            registry::registry().scan_owned_by(platform::current_thread_id())
        }
        None => None,
    };
    if let Some(instance) = target {
        instance.fire_interrupt();
    }
}

extern "C" fn signal_trampoline(_signal: c_int) {
    dispatch_current_thread();
}

static TRAMPOLINE: Once = Once::new();

/// Route the process interrupt signal to the dispatcher. First-creation
/// hook; the registration outlives full teardown.
pub(crate) fn install_trampoline() {
    TRAMPOLINE.call_once(|| platform::install_interrupt_signal(signal_trampoline));
}
