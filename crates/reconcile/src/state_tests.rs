use peer_collab::testkit::{FakeImageReplayer, FakeWatchHandle};
use peer_core::{GlobalImageId, ImageId, PoolId};

use super::*;

fn pool(n: i64) -> PoolId {
    PoolId::new(n)
}

#[test]
fn fresh_state_is_drained() {
    let state = ReconcilerState::new();
    assert!(state.is_drained());
    assert_eq!(state.worker_count(), 0);
}

#[test]
fn non_empty_images_is_not_drained() {
    let mut state = ReconcilerState::new();
    let replayer = FakeImageReplayer::new(pool(1), ImageId::new("img"), GlobalImageId::new("g"));
    state.images.entry(pool(1)).or_default().insert(ImageId::new("img"), Worker::new(Box::new(replayer)));
    assert!(!state.is_drained());
    assert_eq!(state.worker_count(), 1);
}

#[test]
fn open_status_watch_without_workers_is_not_drained() {
    let mut state = ReconcilerState::new();
    state.status_watches.insert(pool(1), Box::new(FakeWatchHandle::new(false)));
    assert!(!state.is_drained());
}

#[test]
fn worker_count_sums_across_pools() {
    let mut state = ReconcilerState::new();
    for (pool_id, image_id) in [(pool(1), "a"), (pool(1), "b"), (pool(2), "c")] {
        let replayer = FakeImageReplayer::new(pool_id, ImageId::new(image_id), GlobalImageId::new(image_id));
        state.images.entry(pool_id).or_default().insert(ImageId::new(image_id), Worker::new(Box::new(replayer)));
    }
    assert_eq!(state.worker_count(), 3);
}
