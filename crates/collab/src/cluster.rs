// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster handle contract (spec.md §6).
//!
//! A `ClusterHandle` is a connection to one Ceph-like cluster (local or
//! remote). All methods are synchronous: the reconciler calls them while
//! holding the supervisor lock, exactly as spec.md §4.4 describes, so an
//! implementation must not block for long (pool/ioctx metadata reads, not
//! data-plane I/O).

use std::fmt;

use crate::error::CollabError;
use crate::ioctx::IoCtx;
use peer_core::PoolId;

/// Identity of the process holding this cluster handle, used by
/// `StatusWatchMgr::open` to clean up stale per-instance status left by a
/// previous crashed instance (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pool as enumerated by `pool_list` (spec.md §4.2 step 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolListing {
    pub id: PoolId,
    pub name: String,
}

/// Connection to one cluster (local or remote).
///
/// Implementations are expected to be cheap to clone/share (`Arc` the
/// concrete type) since both the local and remote handle are held for the
/// lifetime of the supervisor.
pub trait ClusterHandle: Send + Sync {
    /// Establish the underlying connection. Called once during `init`
    /// (spec.md §4.1 step d); failure is fatal and propagated as
    /// `CollabError::Connect`.
    fn connect(&self) -> Result<(), CollabError>;

    /// List all pools visible to this cluster handle.
    fn pool_list(&self) -> Result<Vec<PoolListing>, CollabError>;

    /// Resolve the base tier id for a pool (used by `InitBootstrap` to
    /// skip cache-tier pools, spec.md §4.2 step 1).
    fn pool_get_base_tier(&self, pool_id: PoolId) -> Result<PoolId, CollabError>;

    /// Open an I/O context for a pool by id.
    fn ioctx_create(&self, pool_id: PoolId) -> Result<Box<dyn IoCtx>, CollabError>;

    /// Open an I/O context for a pool on this handle's cluster by *name*,
    /// returning `CollabError::NotFound` when no such pool exists. Used by
    /// `InitBootstrap` step 4 to resolve the remote pool id for a local
    /// pool name.
    fn ioctx_create_by_name(&self, name: &str) -> Result<Box<dyn IoCtx>, CollabError>;

    /// Identity of this process, for `StatusWatchMgr`.
    fn instance_id(&self) -> InstanceId;
}
