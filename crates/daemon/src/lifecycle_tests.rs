use std::sync::Arc;

use peer_collab::testkit::{FakeClusterHandle, FakeImageDeleter, FakeImageReplayerFactory, FakeIoCtx, FakePoolWatcher};
use peer_collab::MirrorMode;
use peer_core::PoolId;

use super::*;

fn pool(n: i64) -> PoolId {
    PoolId::new(n)
}

fn add_mirrored_pool(cluster: &FakeClusterHandle, pool_id: PoolId, name: &str, uuid: &str) {
    let ioctx = Arc::new(FakeIoCtx::new(pool_id));
    ioctx.set_mirror_mode(MirrorMode::Pool);
    ioctx.set_mirror_uuid(uuid);
    cluster.add_pool(pool_id, name, ioctx);
}

fn args(rt: &tokio::runtime::Runtime) -> InitArgs {
    let local = FakeClusterHandle::new("local");
    let remote = FakeClusterHandle::new("remote");
    add_mirrored_pool(&local, pool(7), "vol", "local-uuid");
    add_mirrored_pool(&remote, pool(7), "vol", "remote-uuid");

    InitArgs {
        peer: PeerId::new("site-b", "client.rbd-mirror-peer"),
        local: Arc::new(local),
        remote: Arc::new(remote),
        deleter: Arc::new(FakeImageDeleter::new()),
        factory: Arc::new(FakeImageReplayerFactory::new()),
        pool_watcher: Arc::new(FakePoolWatcher::new()),
        config_path: None,
        extra_args: vec!["--cluster".to_string(), "site-b".to_string()],
        rt: rt.handle().clone(),
    }
}

#[test]
fn init_spawns_the_control_loop_and_destroy_joins_it() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let replayer = PeerReplayer::init(args(&rt)).expect("init should succeed");
    assert_eq!(replayer.peer().cluster_name(), "site-b");
    assert_eq!(replayer.config().cluster, "site-b");
    replayer.destroy();
}

#[test]
fn init_once_runs_a_single_tick_without_spawning_a_thread() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    PeerReplayer::init_once(args(&rt)).expect("init_once should succeed");
}

#[test]
fn init_fails_when_extra_args_omit_the_required_cluster_setting() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let mut a = args(&rt);
    a.extra_args = vec![];
    let err = PeerReplayer::init(a).unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidArgument(_)));
}

#[test]
fn init_fails_when_remote_cluster_cannot_connect() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let mut a = args(&rt);
    let remote = FakeClusterHandle::new("remote");
    remote.fail_connect();
    a.remote = Arc::new(remote);
    let err = PeerReplayer::init(a).unwrap_err();
    assert!(matches!(err, LifecycleError::ConnectFailure(_)));
}

#[test]
fn admin_dispatch_reaches_the_live_supervisor() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let replayer = PeerReplayer::init(args(&rt)).expect("init should succeed");

    let report = replayer.dispatch_admin(AdminCommand::Status).expect("status always replies");
    assert_eq!(report.peer, "site-b");

    replayer.destroy();
    assert!(replayer.dispatch_admin(AdminCommand::Status).is_none(), "admin surface is a no-op once stopping");
}
