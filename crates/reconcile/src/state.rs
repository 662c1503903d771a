// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory model the reconciler mutates: per-pool workers, per-pool
//! status watches, and bootstrap residue (spec.md §3).

use std::collections::HashMap;

use peer_collab::{ImageReplayer, WatchHandle};
use peer_core::{ImageId, InitResidue, PoolId};

/// Exclusively-owned handle to an `ImageReplayer`. The reconciler is the
/// sole owner (spec.md invariant 1) — nothing else ever holds a `Worker`.
pub struct Worker {
    replayer: Box<dyn ImageReplayer>,
}

impl Worker {
    pub fn new(replayer: Box<dyn ImageReplayer>) -> Self {
        Self { replayer }
    }

    pub fn replayer(&self) -> &dyn ImageReplayer {
        self.replayer.as_ref()
    }
}

/// Workers currently known to the reconciler, keyed by pool then
/// pool-local image id (spec.md §3 `Images`).
pub type Images = HashMap<PoolId, HashMap<ImageId, Worker>>;

/// The supervisor's single coarse-locked model (spec.md §3, invariant 4 —
/// every mutation to these fields happens under the control loop's lock).
#[derive(Default)]
pub struct ReconcilerState {
    pub images: Images,
    pub status_watches: HashMap<PoolId, Box<dyn WatchHandle>>,
    pub init_residue: InitResidue,
    /// Set by the `stop` admin command, cleared by `start`/`restart`.
    /// While set, the control loop skips reconciliation entirely (spec.md
    /// §4.6, §4.3, §8 invariant 5).
    pub manual_stopped: bool,
    /// Set once and never cleared: after this, no new `Worker` is ever
    /// created (spec.md invariant 5).
    pub stopping: bool,
}

impl ReconcilerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once every pool has no workers and no open status watch — the
    /// condition the drain loop waits for (spec.md §4.3).
    pub fn is_drained(&self) -> bool {
        self.images.values().all(|workers| workers.is_empty()) && self.status_watches.is_empty()
    }

    pub fn worker_count(&self) -> usize {
        self.images.values().map(|workers| workers.len()).sum()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
