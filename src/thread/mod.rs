/*!
 * Thread-Local Binding
 *
 * Each thread owns at most one runtime instance through a thread-local cell
 * holding the instance's ownership token. The cell's destructor doubles as
 * the thread-exit hook: an instance still bound when the thread dies is
 * detached and destroyed, whether it arrived by lazy attach or by resume.
 */

use crate::core::errors::{fatal, RuntimeError};
use crate::instance::status::ExecutionStatus;
use crate::instance::{lifecycle, RuntimeHandle, RuntimeInstance};
use log::debug;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// Owner slot for the calling thread's instance.
#[derive(Default)]
struct ThreadBinding {
    handle: Option<RuntimeHandle>,
}

impl Drop for ThreadBinding {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(
                "Thread exit with bound instance {}; destroying",
                handle.instance().id()
            );
            lifecycle::destroy_attached(handle);
        }
    }
}

thread_local! {
    static BINDING: RefCell<ThreadBinding> = RefCell::new(ThreadBinding::default());
    static IS_MAIN: Cell<bool> = const { Cell::new(false) };
}

/// Attach-or-create: after this call the thread has a bound, running
/// instance. A no-op when one is already bound.
pub fn ensure_attached() {
    if try_current().is_some() {
        return;
    }
    let handle = lifecycle::create();
    handle.instance().status.transition(
        "attach",
        ExecutionStatus::Suspended,
        ExecutionStatus::Running,
    );
    bind(handle);
}

/// Detach and destroy the calling thread's instance; a no-op when none is
/// bound.
///
/// The binding is cleared before teardown begins, so teardown-phase callbacks
/// observe an unbound thread. The same holds on the implicit thread-exit
/// path.
pub fn ensure_detached_and_destroyed() {
    if let Some(handle) = take_binding() {
        lifecycle::destroy_attached(handle);
    }
}

/// The calling thread's bound instance; fatal when none.
#[must_use]
pub fn current() -> Arc<RuntimeInstance> {
    match try_current() {
        Some(instance) => instance,
        None => fatal(RuntimeError::NoActiveRuntime),
    }
}

/// Non-fatal probe of the calling thread's binding.
///
/// Returns `None` when nothing is bound, when the thread's locals are
/// mid-destruction, or when the cell is already borrowed because a signal
/// landed inside `bind` or `take_binding` on this thread. Safe to call from
/// teardown callbacks and from signal context; the interrupt path treats an
/// unreadable cell as unbound and falls back to the registry scan.
#[must_use]
pub fn try_current() -> Option<Arc<RuntimeInstance>> {
    BINDING
        .try_with(|cell| {
            let binding = cell.try_borrow().ok()?;
            binding.handle.as_ref().map(|handle| handle.instance().clone())
        })
        .ok()
        .flatten()
}

/// Hand ownership of a running instance to the calling thread's cell.
pub(crate) fn bind(handle: RuntimeHandle) {
    BINDING.with(|cell| {
        let mut binding = cell.borrow_mut();
        if binding.handle.is_some() {
            fatal(RuntimeError::AlreadyActive);
        }
        binding.handle = Some(handle);
    });
}

/// Take ownership back out of the calling thread's cell.
pub(crate) fn take_binding() -> Option<RuntimeHandle> {
    BINDING
        .try_with(|cell| cell.borrow_mut().handle.take())
        .ok()
        .flatten()
}

/// Mark the calling thread as the main thread. First-runtime bring-up only;
/// the flag is never cleared.
pub(crate) fn mark_main_thread() {
    IS_MAIN.with(|flag| flag.set(true));
}

/// Whether the calling thread performed first-runtime bring-up.
#[must_use]
pub fn is_main_thread() -> bool {
    IS_MAIN.try_with(Cell::get).unwrap_or(false)
}

/// Guard for operations restricted to the main thread.
pub fn check_main_thread() {
    if !is_main_thread() {
        fatal(RuntimeError::NotMainThread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_thread_has_no_binding() {
        std::thread::spawn(|| {
            assert!(try_current().is_none());
            assert!(!is_main_thread());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_dispatch_with_cell_mid_mutation_falls_back_to_scan() {
        use crate::interrupt::dispatch_current_thread;
        use std::sync::atomic::{AtomicUsize, Ordering};

        static FIRED: AtomicUsize = AtomicUsize::new(0);

        ensure_attached();
        current().set_interrupt_handler(|_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        });

        // A signal can land while this thread is inside `bind` or
        // `take_binding`. The cell is then mutably borrowed: it reads as
        // unbound and dispatch lands through the registry scan instead of
        // panicking out of the signal handler.
        BINDING.with(|cell| {
            let _mutating = cell.borrow_mut();
            assert!(try_current().is_none());
            dispatch_current_thread();
        });
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);

        // With the cell released the binding path serves again.
        dispatch_current_thread();
        assert_eq!(FIRED.load(Ordering::SeqCst), 2);

        ensure_detached_and_destroyed();
    }

    #[test]
    #[should_panic(expected = "No active runtime on this thread")]
    fn test_current_without_binding_is_fatal() {
        let _ = current();
    }

    #[test]
    #[should_panic(expected = "restricted to the main thread")]
    fn test_check_main_thread_off_main_is_fatal() {
        check_main_thread();
    }
}
