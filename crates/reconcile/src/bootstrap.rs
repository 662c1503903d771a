// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `InitBootstrap` (spec.md §4.2): a one-shot scan of the local cluster,
//! producing the residue the first reconciliation drains.

use std::collections::HashSet;

use peer_collab::{ClusterHandle, CollabError};
use peer_core::{InitImageInfo, InitResidue, PoolId};

const PAGE_SIZE: usize = 1024;

/// Scan every mirroring-enabled pool on `local`, resolving each pool's
/// reconciliation key against `remote` (spec.md §4.2 step 4), and return the
/// resulting residue. Never fails outright — per-pool errors are logged and
/// that pool is skipped (spec.md §7 `TransientStorageError`).
pub fn run(local: &dyn ClusterHandle, remote: &dyn ClusterHandle) -> InitResidue {
    let mut residue = InitResidue::new();

    let pools = match local.pool_list() {
        Ok(pools) => pools,
        Err(err) => {
            tracing::warn!(error = %err, "init bootstrap: local pool_list failed");
            return residue;
        }
    };

    for pool in pools {
        match local.pool_get_base_tier(pool.id) {
            Ok(base_tier) if base_tier == pool.id => {}
            Ok(_) => continue, // cache tier, skip
            Err(err) => {
                tracing::warn!(pool_id = %pool.id, error = %err, "init bootstrap: pool_get_base_tier failed");
                continue;
            }
        }

        let local_ioctx = match local.ioctx_create(pool.id) {
            Ok(ioctx) => ioctx,
            Err(CollabError::NotFound) => continue,
            Err(err) => {
                tracing::warn!(pool_id = %pool.id, error = %err, "init bootstrap: local ioctx_create failed");
                continue;
            }
        };

        match local_ioctx.mirror_mode_get() {
            Ok(mode) if mode.is_enabled() => {}
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(pool_id = %pool.id, error = %err, "init bootstrap: mirror_mode_get failed");
                continue;
            }
        }

        let key_pool_id: PoolId = match remote.ioctx_create_by_name(&pool.name) {
            Ok(remote_ioctx) => remote_ioctx.pool_id(),
            Err(CollabError::NotFound) => pool.id,
            Err(err) => {
                tracing::warn!(pool_id = %pool.id, error = %err, "init bootstrap: remote ioctx_create_by_name failed");
                continue;
            }
        };

        let mut images = HashSet::new();
        let mut after = None;
        loop {
            let page = match local_ioctx.mirror_image_list(after.as_ref(), PAGE_SIZE) {
                Ok(page) => page,
                Err(err) => {
                    tracing::warn!(pool_id = %pool.id, error = %err, "init bootstrap: mirror_image_list failed");
                    break;
                }
            };
            let full = page.is_full(PAGE_SIZE);
            after = page.entries.last().map(|(id, _)| id.clone());

            for (image_id, global_id) in page.entries {
                let name = match local_ioctx.dir_get_name(&image_id) {
                    Ok(name) => name,
                    Err(err) => {
                        tracing::warn!(pool_id = %pool.id, image_id = %image_id, error = %err, "init bootstrap: dir_get_name failed");
                        continue;
                    }
                };
                images.insert(InitImageInfo { global_id, pool_id: pool.id, id: image_id, name });
            }

            if !full {
                break;
            }
        }

        if !images.is_empty() {
            residue.entry(key_pool_id).or_default().extend(images);
        }
    }

    residue
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
