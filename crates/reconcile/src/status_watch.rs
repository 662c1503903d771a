// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StatusWatchMgr` (spec.md §4.5): per-pool lifecycle of the status watch
//! registered on the pool's mirroring metadata object.

use peer_collab::{CollabError, IoCtx};
use peer_core::PoolId;

use crate::state::ReconcilerState;

/// Open a status watch for `pool_id`. Requires no existing entry — callers
/// only invoke this on the reconciliation step that first inserts a worker
/// into a previously empty pool (spec.md §4.4 phase 3 step 3).
pub fn open(state: &mut ReconcilerState, pool_id: PoolId, ioctx: &dyn IoCtx, instance_id: &peer_collab::InstanceId) -> Result<(), CollabError> {
    debug_assert!(!state.status_watches.contains_key(&pool_id), "status watch already open for pool {pool_id}");

    ioctx.mirror_image_status_remove_down(instance_id)?;
    // The supervisor never acts on notifications (spec.md §4.5): acknowledge
    // immediately with an empty body.
    let handle = ioctx.watch(Box::new(|| {}))?;
    state.status_watches.insert(pool_id, handle);
    Ok(())
}

/// Close the status watch for `pool_id`, if one is open. Unregister errors
/// are logged but never block erasing the pool entry (spec.md §4.5).
pub fn close(state: &mut ReconcilerState, pool_id: PoolId) {
    if let Some(handle) = state.status_watches.remove(&pool_id) {
        if let Err(err) = handle.unwatch() {
            tracing::warn!(pool_id = %pool_id, error = %err, "status watch unregister failed");
        }
    }
}

#[cfg(test)]
#[path = "status_watch_tests.rs"]
mod tests;
