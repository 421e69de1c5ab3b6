/*!
 * Suspend and Resume Tests
 * Detaching a running instance from its thread, moving the handle across
 * threads, and the memory handle exchange on both edges
 */

use pretty_assertions::assert_eq;
use runtime_host::memory::RecordingMemory;
use runtime_host::{
    alive_count, create, current, destroy, ensure_attached, ensure_detached_and_destroyed,
    instances, resume, set_memory_subsystem, suspend, try_current, ExecutionStatus,
};
use serial_test::serial;
use std::sync::{Arc, LazyLock, Once};

static MEMORY: LazyLock<Arc<RecordingMemory>> = LazyLock::new(|| Arc::new(RecordingMemory::new()));
static SETUP: Once = Once::new();

fn setup() {
    SETUP.call_once(|| {
        set_memory_subsystem(MEMORY.clone());
    });
}

#[test]
#[serial]
fn test_suspend_clears_binding_but_keeps_registration() {
    setup();
    ensure_attached();
    let instance = current();
    let suspends_before = MEMORY.suspends();

    let handle = suspend();
    assert!(try_current().is_none());
    assert_eq!(instance.status(), ExecutionStatus::Suspended);
    assert_eq!(instances().len(), 1);
    assert_eq!(MEMORY.suspends(), suspends_before + 1);

    destroy(handle);
    assert!(instances().is_empty());
    assert_eq!(alive_count(), 0);
}

#[test]
#[serial]
fn test_resume_on_another_thread_keeps_owner_identity() {
    setup();
    ensure_attached();
    let instance_id = current().id();
    let owner = current().owning_thread_id();

    let handle = suspend();
    // Token granted by the suspend we just performed.
    let suspend_token = (MEMORY.inits() + MEMORY.suspends()) as u64;

    std::thread::spawn(move || {
        assert!(try_current().is_none());
        resume(handle);

        let resumed = current();
        assert_eq!(resumed.id(), instance_id);
        assert_eq!(resumed.owning_thread_id(), owner);
        assert!(resumed.status().is_running());
        assert_eq!(MEMORY.last_resumed(), suspend_token);

        ensure_detached_and_destroyed();
    })
    .join()
    .unwrap();

    assert_eq!(alive_count(), 0);
}

#[test]
#[serial]
fn test_suspend_resume_cycle_exchanges_memory_tokens() {
    setup();
    ensure_attached();
    let create_token = (MEMORY.inits() + MEMORY.suspends()) as u64;

    let handle = suspend();
    let suspend_token = (MEMORY.inits() + MEMORY.suspends()) as u64;
    assert_ne!(create_token, suspend_token);

    resume(handle);
    // Resume hands the suspend-time token back to the memory subsystem.
    assert_eq!(MEMORY.last_resumed(), suspend_token);

    let handle = suspend();
    destroy(handle);
    // Destruction releases whichever token the instance held last.
    assert_eq!(MEMORY.last_released(), (MEMORY.inits() + MEMORY.suspends()) as u64);
    assert_eq!(alive_count(), 0);
}

#[test]
#[serial]
fn test_explicit_create_resume_suspend_destroy_round() {
    setup();
    let resumes_before = MEMORY.resumes();

    // Explicit creation leaves the new instance suspended and unbound; the
    // caller decides where it first runs.
    let handle = create();
    assert_eq!(handle.instance().status(), ExecutionStatus::Suspended);
    assert!(try_current().is_none());

    resume(handle);
    assert!(current().status().is_running());
    assert_eq!(MEMORY.resumes(), resumes_before + 1);

    let handle = suspend();
    destroy(handle);
    assert_eq!(alive_count(), 0);
}
