// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fakes for every collaborator contract, used by
//! `peer-reconcile` and `peer-daemon`'s test suites. These are not a
//! second implementation of the real collaborators — they are scriptable
//! doubles that record every call so a test can assert exactly what the
//! reconciler asked for.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use peer_core::{GlobalImageId, ImageId, PoolId};

use crate::cluster::{ClusterHandle, InstanceId, PoolListing};
use crate::deleter::{DeletionCompletion, ImageDeleter};
use crate::error::CollabError;
use crate::ioctx::{IoCtx, MirrorImagePage, MirrorMode};
use crate::pool_watcher::PoolWatcher;
use crate::replayer::{CompletionHook, ImageReplayer, ImageReplayerFactory, ReplayerState, ReplayerStatus};
use crate::watch::WatchHandle;

/// A scheduled-deletion call recorded by `FakeImageDeleter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDeletion {
    pub pool_id: PoolId,
    pub image_id: ImageId,
    pub image_name: Option<String>,
    pub global_id: GlobalImageId,
}

#[derive(Default)]
struct DeleterInner {
    scheduled: Vec<ScheduledDeletion>,
    /// Queued results for `wait_for_scheduled_deletion`, consumed in FIFO
    /// order per name. Defaults to an immediate `Ok` (0) when empty.
    wait_results: HashMap<String, VecDeque<i32>>,
}

/// Fake `ImageDeleter`: records every scheduled deletion and lets tests
/// script `wait_for_scheduled_deletion`'s result sequence per name.
#[derive(Clone, Default)]
pub struct FakeImageDeleter {
    inner: Arc<Mutex<DeleterInner>>,
}

impl FakeImageDeleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next `wait_for_scheduled_deletion(name, ...)`
    /// call. Call multiple times to script a sequence (e.g. `-EAGAIN` then
    /// `0`, per spec.md §8 scenario 4).
    pub fn queue_wait_result(&self, name: &str, result: i32) {
        self.inner.lock().wait_results.entry(name.to_string()).or_default().push_back(result);
    }

    pub fn scheduled(&self) -> Vec<ScheduledDeletion> {
        self.inner.lock().scheduled.clone()
    }
}

impl ImageDeleter for FakeImageDeleter {
    fn schedule_image_delete(
        &self,
        pool_id: PoolId,
        image_id: ImageId,
        image_name: Option<String>,
        global_id: GlobalImageId,
    ) {
        self.inner.lock().scheduled.push(ScheduledDeletion { pool_id, image_id, image_name, global_id });
    }

    fn wait_for_scheduled_deletion(&self, name: &str, _retry_on_error: bool, completion: DeletionCompletion) {
        let result = {
            let mut inner = self.inner.lock();
            inner.wait_results.get_mut(name).and_then(VecDeque::pop_front).unwrap_or(0)
        };
        completion(result);
    }
}

struct ReplayerInner {
    state: ReplayerState,
}

/// Fake `ImageReplayer`. `start`/`stop` transition state and invoke the
/// completion hook synchronously by default; call `stay_stopping()` before
/// `stop` to simulate a worker that hasn't finished stopping by the end of
/// a reconciliation tick (spec.md §8 "Worker still `Stopping`").
pub struct FakeImageReplayer {
    pool_id: PoolId,
    image_id: ImageId,
    global_image_id: GlobalImageId,
    inner: Mutex<ReplayerInner>,
    stay_stopping: Mutex<bool>,
}

impl FakeImageReplayer {
    pub fn new(pool_id: PoolId, image_id: ImageId, global_image_id: GlobalImageId) -> Self {
        Self {
            pool_id,
            image_id,
            global_image_id,
            inner: Mutex::new(ReplayerInner { state: ReplayerState::Stopped }),
            stay_stopping: Mutex::new(false),
        }
    }

    /// Next `stop()` call transitions to `Stopping` and does not complete
    /// until `finish_stopping()` is called.
    pub fn stay_stopping(&self) {
        *self.stay_stopping.lock() = true;
    }

    pub fn finish_stopping(&self) {
        self.inner.lock().state = ReplayerState::Stopped;
    }

    pub fn state(&self) -> ReplayerState {
        self.inner.lock().state
    }
}

impl ImageReplayer for FakeImageReplayer {
    fn is_stopped(&self) -> bool {
        self.inner.lock().state == ReplayerState::Stopped
    }

    fn is_running(&self) -> bool {
        self.inner.lock().state == ReplayerState::Running
    }

    fn start(&self, on_complete: CompletionHook, _manual: bool) {
        self.inner.lock().state = ReplayerState::Running;
        on_complete(Ok(()));
    }

    fn stop(&self, on_complete: CompletionHook, _manual: bool) {
        let stay = {
            let mut stay = self.stay_stopping.lock();
            let v = *stay;
            *stay = false;
            v
        };
        if stay {
            self.inner.lock().state = ReplayerState::Stopping;
        } else {
            self.inner.lock().state = ReplayerState::Stopped;
        }
        on_complete(Ok(()));
    }

    fn restart(&self) {
        self.inner.lock().state = ReplayerState::Running;
    }

    fn flush(&self) {}

    fn print_status(&self) -> ReplayerStatus {
        ReplayerStatus {
            pool_id: self.pool_id,
            image_id: self.image_id.clone(),
            global_image_id: self.global_image_id.clone(),
            image_name: None,
            state: self.state(),
            description: String::new(),
        }
    }

    fn local_pool_id(&self) -> PoolId {
        self.pool_id
    }

    fn local_image_id(&self) -> ImageId {
        self.image_id.clone()
    }

    fn local_image_name(&self) -> Option<String> {
        None
    }

    fn global_image_id(&self) -> GlobalImageId {
        self.global_image_id.clone()
    }
}

/// Fake factory that hands out `FakeImageReplayer`s and records every
/// construction call.
#[derive(Clone, Default)]
pub struct FakeImageReplayerFactory {
    created: Arc<Mutex<Vec<(PoolId, ImageId, GlobalImageId)>>>,
}

impl FakeImageReplayerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<(PoolId, ImageId, GlobalImageId)> {
        self.created.lock().clone()
    }
}

impl ImageReplayerFactory for FakeImageReplayerFactory {
    fn create(
        &self,
        _threads: u32,
        local_pool_id: PoolId,
        _remote_pool_id: PoolId,
        _local_mirror_uuid: &str,
        _remote_mirror_uuid: &str,
        image_id: ImageId,
        global_image_id: GlobalImageId,
    ) -> Box<dyn ImageReplayer> {
        self.created.lock().push((local_pool_id, image_id.clone(), global_image_id.clone()));
        Box::new(FakeImageReplayer::new(local_pool_id, image_id, global_image_id))
    }
}

/// Fake `WatchHandle` recording whether/when it was unregistered.
#[derive(Default)]
pub struct FakeWatchHandle {
    unwatched: Mutex<bool>,
    fail_unwatch: bool,
}

impl FakeWatchHandle {
    pub fn new(fail_unwatch: bool) -> Self {
        Self { unwatched: Mutex::new(false), fail_unwatch }
    }

    pub fn was_unwatched(&self) -> bool {
        *self.unwatched.lock()
    }
}

impl WatchHandle for FakeWatchHandle {
    fn unwatch(&self) -> Result<(), CollabError> {
        *self.unwatched.lock() = true;
        if self.fail_unwatch {
            Err(CollabError::Watch("fake unwatch failure".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct IoCtxInner {
    mirror_mode: MirrorMode,
    mirror_uuid: String,
    /// Full directory contents, in the stable order `mirror_image_list`
    /// pages through.
    directory: Vec<(ImageId, GlobalImageId)>,
    names: HashMap<ImageId, String>,
    remove_down_calls: usize,
    watch_registered: bool,
    fail_watch: bool,
}

/// Fake `IoCtx` for one pool.
pub struct FakeIoCtx {
    pool_id: PoolId,
    inner: Mutex<IoCtxInner>,
}

impl FakeIoCtx {
    pub fn new(pool_id: PoolId) -> Self {
        Self { pool_id, inner: Mutex::new(IoCtxInner::default()) }
    }

    pub fn set_mirror_mode(&self, mode: MirrorMode) {
        self.inner.lock().mirror_mode = mode;
    }

    pub fn set_mirror_uuid(&self, uuid: impl Into<String>) {
        self.inner.lock().mirror_uuid = uuid.into();
    }

    pub fn set_directory(&self, entries: Vec<(ImageId, GlobalImageId)>, names: HashMap<ImageId, String>) {
        let mut inner = self.inner.lock();
        inner.directory = entries;
        inner.names = names;
    }

    pub fn fail_watch(&self) {
        self.inner.lock().fail_watch = true;
    }

    pub fn remove_down_call_count(&self) -> usize {
        self.inner.lock().remove_down_calls
    }
}

impl IoCtx for FakeIoCtx {
    fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    fn mirror_mode_get(&self) -> Result<MirrorMode, CollabError> {
        Ok(self.inner.lock().mirror_mode)
    }

    fn mirror_uuid_get(&self) -> Result<String, CollabError> {
        Ok(self.inner.lock().mirror_uuid.clone())
    }

    fn mirror_image_list(&self, after: Option<&ImageId>, limit: usize) -> Result<MirrorImagePage, CollabError> {
        let inner = self.inner.lock();
        let start = match after {
            None => 0,
            Some(id) => inner.directory.iter().position(|(i, _)| i == id).map(|p| p + 1).unwrap_or(inner.directory.len()),
        };
        let entries = inner.directory[start.min(inner.directory.len())..]
            .iter()
            .take(limit)
            .cloned()
            .collect();
        Ok(MirrorImagePage { entries })
    }

    fn dir_get_name(&self, image_id: &ImageId) -> Result<String, CollabError> {
        self.inner.lock().names.get(image_id).cloned().ok_or(CollabError::NotFound)
    }

    fn mirror_image_status_remove_down(&self, _instance_id: &InstanceId) -> Result<(), CollabError> {
        self.inner.lock().remove_down_calls += 1;
        Ok(())
    }

    fn watch(&self, _on_notify: Box<dyn Fn() + Send + Sync>) -> Result<Box<dyn WatchHandle>, CollabError> {
        let mut inner = self.inner.lock();
        if inner.fail_watch {
            return Err(CollabError::Watch("fake watch failure".into()));
        }
        inner.watch_registered = true;
        Ok(Box::new(FakeWatchHandle::new(false)))
    }
}

#[derive(Default)]
struct ClusterInner {
    pools: Vec<PoolListing>,
    base_tiers: HashMap<PoolId, PoolId>,
    ioctxs_by_id: HashMap<PoolId, Arc<FakeIoCtx>>,
    ioctxs_by_name: HashMap<String, Arc<FakeIoCtx>>,
    fail_connect: bool,
}

/// Fake `ClusterHandle`. Build one per cluster (local/remote) in a test,
/// register pools and pre-built `FakeIoCtx`s, then hand the `Arc` to the
/// code under test.
#[derive(Clone)]
pub struct FakeClusterHandle {
    instance_id: InstanceId,
    inner: Arc<Mutex<ClusterInner>>,
}

impl FakeClusterHandle {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self { instance_id: InstanceId::new(instance_id), inner: Arc::default() }
    }

    pub fn add_pool(&self, id: PoolId, name: impl Into<String>, ioctx: Arc<FakeIoCtx>) {
        let name = name.into();
        let mut inner = self.inner.lock();
        inner.pools.push(PoolListing { id, name: name.clone() });
        inner.base_tiers.insert(id, id);
        inner.ioctxs_by_id.insert(id, ioctx.clone());
        inner.ioctxs_by_name.insert(name, ioctx);
    }

    pub fn set_base_tier(&self, pool_id: PoolId, base_tier: PoolId) {
        self.inner.lock().base_tiers.insert(pool_id, base_tier);
    }

    pub fn fail_connect(&self) {
        self.inner.lock().fail_connect = true;
    }
}

impl ClusterHandle for FakeClusterHandle {
    fn connect(&self) -> Result<(), CollabError> {
        if self.inner.lock().fail_connect {
            Err(CollabError::Connect("fake connect failure".into()))
        } else {
            Ok(())
        }
    }

    fn pool_list(&self) -> Result<Vec<PoolListing>, CollabError> {
        Ok(self.inner.lock().pools.clone())
    }

    fn pool_get_base_tier(&self, pool_id: PoolId) -> Result<PoolId, CollabError> {
        Ok(self.inner.lock().base_tiers.get(&pool_id).copied().unwrap_or(pool_id))
    }

    fn ioctx_create(&self, pool_id: PoolId) -> Result<Box<dyn IoCtx>, CollabError> {
        self.inner
            .lock()
            .ioctxs_by_id
            .get(&pool_id)
            .map(|ctx| Box::new(FakeIoCtxHandle(ctx.clone())) as Box<dyn IoCtx>)
            .ok_or(CollabError::NotFound)
    }

    fn ioctx_create_by_name(&self, name: &str) -> Result<Box<dyn IoCtx>, CollabError> {
        self.inner
            .lock()
            .ioctxs_by_name
            .get(name)
            .map(|ctx| Box::new(FakeIoCtxHandle(ctx.clone())) as Box<dyn IoCtx>)
            .ok_or(CollabError::NotFound)
    }

    fn instance_id(&self) -> InstanceId {
        self.instance_id.clone()
    }
}

/// Thin `Arc<FakeIoCtx>` wrapper so `ioctx_create*` can return a boxed
/// trait object while the test keeps its own `Arc<FakeIoCtx>` to script.
struct FakeIoCtxHandle(Arc<FakeIoCtx>);

impl IoCtx for FakeIoCtxHandle {
    fn pool_id(&self) -> PoolId {
        self.0.pool_id()
    }
    fn mirror_mode_get(&self) -> Result<MirrorMode, CollabError> {
        self.0.mirror_mode_get()
    }
    fn mirror_uuid_get(&self) -> Result<String, CollabError> {
        self.0.mirror_uuid_get()
    }
    fn mirror_image_list(&self, after: Option<&ImageId>, limit: usize) -> Result<MirrorImagePage, CollabError> {
        self.0.mirror_image_list(after, limit)
    }
    fn dir_get_name(&self, image_id: &ImageId) -> Result<String, CollabError> {
        self.0.dir_get_name(image_id)
    }
    fn mirror_image_status_remove_down(&self, instance_id: &InstanceId) -> Result<(), CollabError> {
        self.0.mirror_image_status_remove_down(instance_id)
    }
    fn watch(&self, on_notify: Box<dyn Fn() + Send + Sync>) -> Result<Box<dyn WatchHandle>, CollabError> {
        self.0.watch(on_notify)
    }
}

/// Fake `PoolWatcher` whose target set a test sets directly.
#[derive(Clone, Default)]
pub struct FakePoolWatcher {
    images: Arc<Mutex<peer_core::PoolImageIds>>,
}

impl FakePoolWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_images(&self, images: peer_core::PoolImageIds) {
        *self.images.lock() = images;
    }
}

impl PoolWatcher for FakePoolWatcher {
    fn refresh_images(&self) -> Result<(), CollabError> {
        Ok(())
    }

    fn get_images(&self) -> peer_core::PoolImageIds {
        self.images.lock().clone()
    }
}
