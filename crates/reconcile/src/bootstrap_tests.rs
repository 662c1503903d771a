use std::collections::HashMap;
use std::sync::Arc;

use peer_collab::testkit::{FakeClusterHandle, FakeIoCtx};
use peer_collab::MirrorMode;
use peer_core::{GlobalImageId, ImageId, PoolId};

use super::*;

fn pool(n: i64) -> PoolId {
    PoolId::new(n)
}

#[test]
fn skips_cache_tier_pools() {
    let local = FakeClusterHandle::new("local");
    let ioctx = Arc::new(FakeIoCtx::new(pool(1)));
    ioctx.set_mirror_mode(MirrorMode::Pool);
    local.add_pool(pool(1), "cache", ioctx);
    local.set_base_tier(pool(1), pool(2)); // base tier differs: this is a cache tier
    let remote = FakeClusterHandle::new("remote");

    let residue = run(&local, &remote);
    assert!(residue.is_empty());
}

#[test]
fn skips_pools_with_mirroring_disabled() {
    let local = FakeClusterHandle::new("local");
    let ioctx = Arc::new(FakeIoCtx::new(pool(1)));
    // mirror_mode defaults to Disabled
    local.add_pool(pool(1), "vol", ioctx);
    let remote = FakeClusterHandle::new("remote");

    let residue = run(&local, &remote);
    assert!(residue.is_empty());
}

#[test]
fn keys_residue_by_remote_pool_id_when_remote_pool_exists() {
    let local = FakeClusterHandle::new("local");
    let local_ioctx = Arc::new(FakeIoCtx::new(pool(7)));
    local_ioctx.set_mirror_mode(MirrorMode::Pool);
    local_ioctx.set_directory(
        vec![(ImageId::new("a"), GlobalImageId::new("ga"))],
        HashMap::from([(ImageId::new("a"), "image-a".to_string())]),
    );
    local.add_pool(pool(7), "vol", local_ioctx);

    let remote = FakeClusterHandle::new("remote");
    let remote_ioctx = Arc::new(FakeIoCtx::new(pool(99)));
    remote.add_pool(pool(99), "vol", remote_ioctx);

    let residue = run(&local, &remote);
    let entries = residue.get(&pool(99)).expect("residue keyed by remote pool id");
    assert_eq!(entries.len(), 1);
    let entry = entries.iter().next().unwrap();
    assert_eq!(entry.global_id, GlobalImageId::new("ga"));
    assert_eq!(entry.pool_id, pool(7), "entry.pool_id is the local pool id per spec.md §4.2 step 5; the map key alone is the remote id");
    assert_eq!(entry.name, "image-a");
}

#[test]
fn falls_back_to_local_pool_id_when_remote_pool_missing() {
    let local = FakeClusterHandle::new("local");
    let local_ioctx = Arc::new(FakeIoCtx::new(pool(11)));
    local_ioctx.set_mirror_mode(MirrorMode::Image);
    local_ioctx.set_directory(
        vec![(ImageId::new("x"), GlobalImageId::new("gx"))],
        HashMap::from([(ImageId::new("x"), "image-x".to_string())]),
    );
    local.add_pool(pool(11), "vol", local_ioctx);

    let remote = FakeClusterHandle::new("remote"); // no pool named "vol" registered

    let residue = run(&local, &remote);
    assert!(residue.contains_key(&pool(11)));
    assert!(!residue.contains_key(&pool(99)));
}

#[test]
fn skips_entries_whose_name_lookup_fails() {
    let local = FakeClusterHandle::new("local");
    let local_ioctx = Arc::new(FakeIoCtx::new(pool(1)));
    local_ioctx.set_mirror_mode(MirrorMode::Pool);
    // directory entry with no matching name: dir_get_name returns NotFound
    local_ioctx.set_directory(vec![(ImageId::new("orphan"), GlobalImageId::new("g"))], HashMap::new());
    local.add_pool(pool(1), "vol", local_ioctx);
    let remote = FakeClusterHandle::new("remote");

    let residue = run(&local, &remote);
    assert!(residue.is_empty());
}
