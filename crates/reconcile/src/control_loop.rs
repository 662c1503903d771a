// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ControlLoop` (spec.md §4.3): the background thread driving periodic
//! reconciliation, honoring manual-stop, and performing ordered shutdown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use peer_collab::PoolWatcher;
use peer_core::{Clock, PoolImageIds};

use crate::reconciler::Reconciler;
use crate::supervisor::Supervisor;

/// Discovery period; doubles as the reconciliation cadence (spec.md §4.3).
const RECONCILE_INTERVAL: Duration = Duration::from_secs(30);
/// Poll interval while draining (spec.md §4.3 "On `stopping`").
const DRAIN_INTERVAL: Duration = Duration::from_secs(1);

/// Drives [`Reconciler`] ticks on a dedicated `std::thread` (not a `tokio`
/// task — spec.md §5 requires the supervisor lock to be held across
/// synchronous, fire-and-forget worker calls, which a cooperative async
/// runtime would make easy to get wrong).
pub struct ControlLoop<C: Clock> {
    supervisor: Arc<Supervisor>,
    reconciler: Arc<Reconciler>,
    pool_watcher: Arc<dyn PoolWatcher>,
    clock: C,
    /// Epoch millis of the last tick that actually reconciled (skipped
    /// while `ManualStopped`), surfaced through `status` for operators.
    last_tick_epoch_ms: AtomicU64,
}

impl<C: Clock + 'static> ControlLoop<C> {
    pub fn new(supervisor: Arc<Supervisor>, reconciler: Arc<Reconciler>, pool_watcher: Arc<dyn PoolWatcher>, clock: C) -> Arc<Self> {
        Arc::new(Self { supervisor, reconciler, pool_watcher, clock, last_tick_epoch_ms: AtomicU64::new(0) })
    }

    pub fn last_tick_epoch_ms(&self) -> u64 {
        self.last_tick_epoch_ms.load(Ordering::Relaxed)
    }

    /// Run exactly one reconciliation tick. This is the unit of work the
    /// background loop repeats, and also what `--once` invokes directly
    /// (spec.md §10).
    pub fn tick(&self) {
        let mut guard = self.supervisor.lock();
        if guard.manual_stopped {
            return;
        }
        // `PoolWatcher::get_images` must be called under the supervisor lock
        // (spec.md §6) — `guard` is held for the duration.
        let target: PoolImageIds = self.pool_watcher.get_images();
        self.reconciler.reconcile(&mut guard, &target);
        self.last_tick_epoch_ms.store(self.clock.epoch_ms(), Ordering::Relaxed);
    }

    /// Signal shutdown and wake the loop. Does not block; callers join the
    /// thread handle returned by [`Self::spawn`] separately (spec.md §4.1
    /// destructor ordering: set `stopping` first, then unregister, then
    /// join).
    pub fn request_stop(&self) {
        let mut guard = self.supervisor.lock();
        guard.stopping = true;
        drop(guard);
        self.supervisor.notify_all();
    }

    /// Spawn the background thread. Returns the join handle so the caller
    /// can block on it during teardown.
    #[allow(clippy::expect_used)] // OS thread creation failure is unrecoverable here
    pub fn spawn(self: &Arc<Self>) -> std::thread::JoinHandle<()> {
        let this = Arc::clone(self);
        std::thread::Builder::new()
            .name("mirror-peer-control".into())
            .spawn(move || this.run())
            .expect("spawn control loop thread")
    }

    fn run(&self) {
        loop {
            {
                let guard = self.supervisor.lock();
                if guard.stopping {
                    break;
                }
            }
            self.tick();
            let mut guard = self.supervisor.lock();
            if guard.stopping {
                break;
            }
            self.supervisor.wait_timeout(&mut guard, RECONCILE_INTERVAL);
        }
        self.reconciler.release_deleter();
        self.drain();
    }

    /// Reconcile against an empty target until every worker has stopped and
    /// every status watch has closed (spec.md §4.3 "On `stopping`").
    fn drain(&self) {
        let empty = PoolImageIds::new();
        loop {
            let mut guard = self.supervisor.lock();
            self.reconciler.reconcile(&mut guard, &empty);
            let drained = guard.is_drained();
            drop(guard);
            if drained {
                break;
            }
            std::thread::sleep(DRAIN_INTERVAL);
        }
    }
}

#[cfg(test)]
#[path = "control_loop_tests.rs"]
mod tests;
