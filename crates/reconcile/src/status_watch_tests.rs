use peer_collab::testkit::FakeIoCtx;
use peer_collab::InstanceId;
use peer_core::PoolId;

use super::*;

fn pool(n: i64) -> PoolId {
    PoolId::new(n)
}

#[test]
fn open_registers_watch_and_clears_down_entries() {
    let mut state = ReconcilerState::new();
    let ioctx = FakeIoCtx::new(pool(1));
    let instance_id = InstanceId::new("inst-a");

    open(&mut state, pool(1), &ioctx, &instance_id).expect("open succeeds");

    assert!(state.status_watches.contains_key(&pool(1)));
    assert_eq!(ioctx.remove_down_call_count(), 1);
}

#[test]
fn open_propagates_watch_failure() {
    let mut state = ReconcilerState::new();
    let ioctx = FakeIoCtx::new(pool(1));
    ioctx.fail_watch();
    let instance_id = InstanceId::new("inst-a");

    let result = open(&mut state, pool(1), &ioctx, &instance_id);

    assert!(result.is_err());
    assert!(!state.status_watches.contains_key(&pool(1)));
}

#[test]
fn close_unregisters_and_erases_even_on_unwatch_error() {
    let mut state = ReconcilerState::new();
    let ioctx = FakeIoCtx::new(pool(1));
    let instance_id = InstanceId::new("inst-a");
    open(&mut state, pool(1), &ioctx, &instance_id).expect("open succeeds");

    close(&mut state, pool(1));

    assert!(!state.status_watches.contains_key(&pool(1)));
}

#[test]
fn close_on_absent_pool_is_a_no_op() {
    let mut state = ReconcilerState::new();
    close(&mut state, pool(42));
    assert!(state.status_watches.is_empty());
}
