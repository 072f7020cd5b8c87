use super::*;
use crate::test_support::{dependents, host, registry, target, topology};
use lcm_storage::Store;
use tempfile::tempdir;

#[test]
fn command_set_state_persists_a_command_with_its_jobs() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let topology = topology();
    let graph = dependents(&topology);
    let reg = registry(&[(target(), "unmounted"), (host(), "lnet_up")]);
    let ctx = PlanContext {
        routes: &topology,
        deps: &topology,
        dependents: &graph,
        registry: &reg,
        lock_cache: store.lock_cache(),
    };

    let targets = vec![StateTarget { instance: target(), new_state: "mounted".to_string() }];
    let command_id = command_set_state(&ctx, &store, targets, "mount target/7", 0).unwrap();

    store.with_state(|s| {
        let command = s.get_command(&command_id).expect("command persisted");
        assert_eq!(command.jobs.len(), 1);
    });
}

#[test]
fn get_transition_consequences_ignores_pending_writes_and_never_persists() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let topology = topology();
    let graph = dependents(&topology);
    let reg = registry(&[(target(), "unmounted"), (host(), "lnet_down")]);
    let ctx = PlanContext {
        routes: &topology,
        deps: &topology,
        dependents: &graph,
        registry: &reg,
        lock_cache: store.lock_cache(),
    };

    let consequences = get_transition_consequences(&ctx, &target(), "mounted")
        .unwrap()
        .expect("a plan exists");

    assert_eq!(consequences.transition_job.class_name, "mount_target");
    assert_eq!(consequences.dependency_jobs.len(), 1);
    assert_eq!(consequences.dependency_jobs[0].stateful_object, host());

    // Nothing was persisted: the store's job table is still empty.
    store.with_state(|s| assert_eq!(s.jobs.len(), 0));
}

#[test]
fn get_transition_consequences_is_none_for_an_already_satisfied_state() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let topology = topology();
    let graph = dependents(&topology);
    let reg = registry(&[(target(), "mounted"), (host(), "lnet_up")]);
    let ctx = PlanContext {
        routes: &topology,
        deps: &topology,
        dependents: &graph,
        registry: &reg,
        lock_cache: store.lock_cache(),
    };

    let consequences = get_transition_consequences(&ctx, &target(), "mounted").unwrap();
    assert!(consequences.is_none());
}
