// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The diff engine (spec.md §4.4): given a target `PoolImageIds` and the
//! current `ReconcilerState`, computes and applies start/stop/delete
//! decisions across three phases every tick.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use peer_collab::{ClusterHandle, ImageDeleter, ImageReplayerFactory};
use peer_core::{ImageId, PoolId, PoolImageIds};

use crate::state::{ReconcilerState, Worker};
use crate::status_watch;
use crate::supervisor::Supervisor;

/// Outcome of the synchronous half of stopping a worker (spec.md §4.4
/// `stop_worker`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Already `Stopped` — safe to erase immediately.
    Done,
    /// Stop requested (or already in flight); erase on a later tick once
    /// the worker reports `Stopped`.
    NotYet,
}

/// Applies target sets to [`ReconcilerState`]. Holds the collaborators
/// needed to open I/O contexts, construct workers, and gate starts on
/// pending deletions.
pub struct Reconciler {
    threads: u32,
    local: Arc<dyn ClusterHandle>,
    remote: Arc<dyn ClusterHandle>,
    factory: Arc<dyn ImageReplayerFactory>,
    /// Held only while `Running`; cleared before drain so the deleter can
    /// quiesce independently (spec.md §5 "Shared resources").
    deleter: Mutex<Option<Arc<dyn ImageDeleter>>>,
    supervisor: Arc<Supervisor>,
    rt: tokio::runtime::Handle,
}

impl Reconciler {
    pub fn new(
        threads: u32,
        local: Arc<dyn ClusterHandle>,
        remote: Arc<dyn ClusterHandle>,
        deleter: Arc<dyn ImageDeleter>,
        factory: Arc<dyn ImageReplayerFactory>,
        supervisor: Arc<Supervisor>,
        rt: tokio::runtime::Handle,
    ) -> Arc<Self> {
        Arc::new(Self {
            threads,
            local,
            remote,
            factory,
            deleter: Mutex::new(Some(deleter)),
            supervisor,
            rt,
        })
    }

    /// Release the strong reference to the `ImageDeleter` (spec.md §4.3 "On
    /// `stopping`"). Idempotent.
    pub fn release_deleter(&self) {
        self.deleter.lock().take();
    }

    /// Run one reconciliation tick against `target`, mutating `state` in
    /// place. The caller holds `state`'s lock for the duration (spec.md §5).
    pub fn reconcile(self: &Arc<Self>, state: &mut ReconcilerState, target: &PoolImageIds) {
        self.phase1_bootstrap_reconcile(state, target);
        self.phase2_shutdown_drift(state, target);
        self.phase3_target_install(state, target);
    }

    // --- Phase 1 -----------------------------------------------------

    fn phase1_bootstrap_reconcile(&self, state: &mut ReconcilerState, target: &PoolImageIds) {
        if state.init_residue.is_empty() {
            return;
        }
        let residue = std::mem::take(&mut state.init_residue);
        let deleter = self.deleter.lock().clone();

        for (pool_id, entries) in residue {
            let target_images = target.get(&pool_id);
            for entry in entries {
                let matched = target_images
                    .map(|images| images.iter().any(|image| image.global_id == entry.global_id))
                    .unwrap_or(false);
                if matched {
                    continue;
                }
                match &deleter {
                    Some(deleter) => {
                        deleter.schedule_image_delete(pool_id, entry.id, Some(entry.name), entry.global_id);
                    }
                    None => {
                        tracing::warn!(pool_id = %pool_id, "bootstrap residue dropped: deleter unavailable");
                    }
                }
            }
        }
    }

    // --- Phase 2 -----------------------------------------------------

    fn phase2_shutdown_drift(&self, state: &mut ReconcilerState, target: &PoolImageIds) {
        let pool_ids: Vec<PoolId> = state.images.keys().copied().collect();

        for pool_id in pool_ids {
            let target_images = target.get(&pool_id);
            if let Some(workers) = state.images.get_mut(&pool_id) {
                let drop_ids: Vec<ImageId> = workers
                    .iter()
                    .filter(|(image_id, _)| match target_images {
                        None => true,
                        Some(images) => !images.contains(*image_id),
                    })
                    .map(|(image_id, _)| image_id.clone())
                    .collect();

                for image_id in drop_ids {
                    let outcome = workers.get(&image_id).map(|w| self.stop_worker(w));
                    if outcome == Some(StopOutcome::Done) {
                        workers.remove(&image_id);
                    }
                }
            }

            let now_empty = state.images.get(&pool_id).map(|w| w.is_empty()).unwrap_or(false);
            if now_empty {
                status_watch::close(state, pool_id);
                state.images.remove(&pool_id);
            }
        }
    }

    /// The synchronous half-step of stopping a worker (spec.md §4.4).
    pub fn stop_worker(&self, worker: &Worker) -> StopOutcome {
        let replayer = worker.replayer();
        if replayer.is_stopped() {
            return StopOutcome::Done;
        }
        if replayer.is_running() {
            let deleter = self.deleter.lock().clone();
            let pool_id = replayer.local_pool_id();
            let image_id = replayer.local_image_id();
            let image_name = replayer.local_image_name();
            let global_id = replayer.global_image_id();
            replayer.stop(
                Box::new(move |_result| {
                    if let Some(deleter) = deleter {
                        deleter.schedule_image_delete(pool_id, image_id, image_name, global_id);
                    }
                }),
                false,
            );
        }
        StopOutcome::NotYet
    }

    // --- Phase 3 -----------------------------------------------------

    fn phase3_target_install(self: &Arc<Self>, state: &mut ReconcilerState, target: &PoolImageIds) {
        if state.stopping {
            return;
        }

        for (pool_id, image_ids) in target {
            let pool_id = *pool_id;

            let remote_ioctx = match self.remote.ioctx_create(pool_id) {
                Ok(ioctx) => ioctx,
                Err(err) => {
                    tracing::warn!(pool_id = %pool_id, error = %err, "remote ioctx_create failed, skipping pool this tick");
                    continue;
                }
            };
            let local_ioctx = match self.local.ioctx_create(pool_id) {
                Ok(ioctx) => ioctx,
                Err(err) => {
                    tracing::warn!(pool_id = %pool_id, error = %err, "local ioctx_create failed, skipping pool this tick");
                    continue;
                }
            };
            let local_uuid = match local_ioctx.mirror_uuid_get() {
                Ok(uuid) => uuid,
                Err(err) => {
                    tracing::warn!(pool_id = %pool_id, error = %err, "local mirror_uuid_get failed, skipping pool this tick");
                    continue;
                }
            };
            let remote_uuid = match remote_ioctx.mirror_uuid_get() {
                Ok(uuid) => uuid,
                Err(err) => {
                    tracing::warn!(pool_id = %pool_id, error = %err, "remote mirror_uuid_get failed, skipping pool this tick");
                    continue;
                }
            };

            if !state.images.contains_key(&pool_id) {
                state.images.insert(pool_id, HashMap::new());
                if let Err(err) = status_watch::open(state, pool_id, local_ioctx.as_ref(), &self.local.instance_id()) {
                    tracing::warn!(pool_id = %pool_id, error = %err, "status watch open failed, skipping pool this tick");
                    state.images.remove(&pool_id);
                    continue;
                }
            }

            for image in image_ids {
                let workers = state.images.entry(pool_id).or_default();
                if !workers.contains_key(&image.id) {
                    let replayer = self.factory.create(
                        self.threads,
                        local_ioctx.pool_id(),
                        remote_ioctx.pool_id(),
                        &local_uuid,
                        &remote_uuid,
                        image.id.clone(),
                        image.global_id.clone(),
                    );
                    workers.insert(image.id.clone(), Worker::new(replayer));
                }
                self.start_worker(state, pool_id, &image.id, image.name.clone());
            }
        }
    }

    // --- start_worker and its deletion-gated continuation -------------

    /// `start_worker(w, name)` (spec.md §4.4). No-op unless the worker is
    /// currently `Stopped`.
    pub fn start_worker(self: &Arc<Self>, state: &mut ReconcilerState, pool_id: PoolId, image_id: &ImageId, name: Option<String>) {
        let stopped = state
            .images
            .get(&pool_id)
            .and_then(|workers| workers.get(image_id))
            .map(|w| w.replayer().is_stopped())
            .unwrap_or(false);
        if !stopped {
            return;
        }

        match name {
            None => self.start_now(state, pool_id, image_id),
            Some(name) => self.gate_start_on_deletion(pool_id, image_id.clone(), name),
        }
    }

    fn start_now(&self, state: &mut ReconcilerState, pool_id: PoolId, image_id: &ImageId) {
        if let Some(worker) = state.images.get(&pool_id).and_then(|workers| workers.get(image_id)) {
            worker.replayer().start(Box::new(|_result| {}), false);
        }
    }

    /// Spawn the deletion-gate continuation on the bounded `tokio` handle
    /// the reconciler was constructed with. The completion hook re-enters
    /// the supervisor lock only once the deleter calls it back; nothing
    /// here holds the lock while waiting (spec.md §9 "callback-based
    /// continuations").
    fn gate_start_on_deletion(self: &Arc<Self>, pool_id: PoolId, image_id: ImageId, name: String) {
        let Some(deleter) = self.deleter.lock().clone() else {
            // Deleter already released (drain in progress): starting a new
            // worker is moot, the supervisor is shutting down.
            return;
        };
        let this = Arc::clone(self);
        self.rt.spawn(async move {
            let retry_name = name.clone();
            deleter.wait_for_scheduled_deletion(
                &name,
                true,
                Box::new(move |result| {
                    let mut guard = this.supervisor.lock();
                    if result >= 0 {
                        this.start_now(&mut guard, pool_id, &image_id);
                    } else {
                        this.start_worker(&mut guard, pool_id, &image_id, Some(retry_name));
                    }
                    drop(guard);
                    this.supervisor.notify_all();
                }),
            );
        });
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
