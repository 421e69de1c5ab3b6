/*!
 * Registry Tests
 * Exact membership between creation and destruction, locked enumeration,
 * and the serialized instance view
 */

use pretty_assertions::assert_eq;
use runtime_host::{
    create, destroy, instances, platform, with_registry_lock, ExecutionStatus,
};
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn test_instances_reports_registered_instances() {
    let handle = create();
    let id = handle.instance().id();

    let infos = instances();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].instance_id, id);
    assert_eq!(infos[0].owning_thread_id, platform::current_thread_id());
    assert_eq!(infos[0].status, ExecutionStatus::Suspended);
    assert!(!infos[0].has_interrupt_handler);

    destroy(handle);
    assert!(instances().is_empty());
}

#[test]
#[serial]
fn test_lock_guard_enumerates_every_member() {
    let first = create();
    let second = create();
    let ids = [first.instance().id(), second.instance().id()];

    with_registry_lock(|guard| {
        assert_eq!(guard.len(), 2);
        assert!(!guard.is_empty());
        for member in guard.iter() {
            assert!(ids.contains(&member.id()));
        }
    });

    // Early-stop enumeration: the walk ends at the first hit.
    let mut visited = 0;
    with_registry_lock(|guard| {
        guard.for_each_while(|member| {
            visited += 1;
            member.id() != ids[0]
        });
    });
    assert_eq!(visited, 1);

    destroy(first);
    destroy(second);
    with_registry_lock(|guard| assert!(guard.is_empty()));
}

#[test]
#[serial]
fn test_lock_holds_off_concurrent_registration() {
    let existing = create();

    let worker = with_registry_lock(|guard| {
        assert_eq!(guard.len(), 1);
        let worker = std::thread::spawn(create);
        std::thread::sleep(Duration::from_millis(30));
        // Insertion waits on the registry lock; the live view is unchanged.
        assert_eq!(instances().len(), 1);
        worker
    });

    let late = worker.join().unwrap();
    assert_eq!(instances().len(), 2);

    destroy(existing);
    destroy(late);
    assert!(instances().is_empty());
}

#[test]
#[serial]
fn test_instance_info_serializes_with_snake_case_fields() {
    let handle = create();
    let info = handle.instance().info();

    let value = serde_json::to_value(&info).unwrap();
    assert_eq!(value["instance_id"], handle.instance().id());
    assert_eq!(value["status"], "suspended");
    assert_eq!(value["has_interrupt_handler"], false);

    destroy(handle);
}
